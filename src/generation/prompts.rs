//! Prompt templates sent to the generation service.

use crate::domain::{Priority, TestCase};

use super::PromptContext;

/// Prompt seeded from the manual creation form.
pub fn context_prompt(ctx: &PromptContext, count: u32) -> String {
    format!(
        "Based on this context, generate {count} test cases:\n\
         Area: {}\n\
         Module: {}\n\
         SubModule: {}\n\
         Scenario: {}\n\
         Steps: {}\n\
         Expected: {}",
        ctx.area, ctx.module, ctx.submodule, ctx.title, ctx.steps, ctx.expected
    )
}

/// Wrap requirements text in the test case generation instructions.
pub fn test_cases_prompt(prompt: &str, count: u32, default_priority: Priority) -> String {
    format!(
        r#"You are a senior QA engineer with 15+ years of experience.
Generate {count} comprehensive test cases based on the following requirements:

{prompt}

Instructions:
- Default Priority: {default_priority}
- Format test cases in JSON with this structure:
{{
    "test_cases": [
        {{
            "id": "TC_001",
            "title": "Test case title",
            "preconditions": ["Precondition 1"],
            "test_data": ["Data 1"],
            "test_steps": ["Step 1"],
            "expected_results": ["Expected 1"],
            "priority": "High/Medium/Low",
            "attachments": []
        }}
    ]
}}
"#
    )
}

/// Automation code for a single test case.
pub fn automation_prompt_for_one(case: &TestCase) -> String {
    format!(
        r#"You are a super senior QA automation engineer with over 30 years of enterprise experience.
Write complete, production-grade Selenium test automation code in Java using TestNG and Page Object Model.

Based on the following test case:
- Title: {}
- Steps:
{}
- Expected Results:
{}

Output files should be indicated with lines like:
// FILE: src/main/java/com/qa/pages/[PageName]Page.java
[Java code here]
"#,
        case.title,
        case.test_steps.join("\n"),
        case.expected_results.join("\n"),
    )
}

/// One combined suite for several test cases.
pub fn automation_prompt_for_many(cases: &[TestCase]) -> String {
    let listing = cases
        .iter()
        .enumerate()
        .map(|(i, case)| {
            format!(
                "Test Case {}: {}\nSteps:\n{}\nExpected:\n{}",
                i + 1,
                case.title,
                case.test_steps.join("\n"),
                case.expected_results.join("\n"),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"You are a super senior QA automation engineer with over 30 years of enterprise experience.
Create a SINGLE test class that includes test methods for the following test cases:

{listing}

Output the code with file markers as // FILE: path.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(title: &str) -> TestCase {
        TestCase {
            id: "TC_001".to_string(),
            area: String::new(),
            module: String::new(),
            submodule: String::new(),
            title: title.to_string(),
            priority: Priority::High,
            preconditions: vec![],
            test_data: vec![],
            test_steps: vec!["Open app".to_string(), "Submit".to_string()],
            expected_results: vec!["Dashboard shown".to_string()],
            attachments: vec![],
            selected: true,
        }
    }

    #[test]
    fn test_test_cases_prompt_embeds_count_and_priority() {
        let prompt = test_cases_prompt("Login story", 7, Priority::High);
        assert!(prompt.contains("Generate 7 comprehensive test cases"));
        assert!(prompt.contains("- Default Priority: High"));
        assert!(prompt.contains("\"test_cases\": ["));
    }

    #[test]
    fn test_combined_prompt_numbers_cases() {
        let prompt = automation_prompt_for_many(&[case("Login"), case("Logout")]);
        assert!(prompt.contains("Test Case 1: Login\nSteps:\nOpen app\nSubmit"));
        assert!(prompt.contains("Test Case 2: Logout"));
        assert!(prompt.contains("// FILE: path"));
    }

    #[test]
    fn test_single_prompt_asks_for_markers() {
        let prompt = automation_prompt_for_one(&case("Login"));
        assert!(prompt.contains("- Title: Login"));
        assert!(prompt.contains("// FILE: src/main/java/com/qa/pages/"));
    }

    #[test]
    fn test_context_prompt() {
        let ctx = PromptContext {
            area: "UI/UX".to_string(),
            module: "Authentication".to_string(),
            submodule: "Login".to_string(),
            title: "Valid login".to_string(),
            steps: "1. Open".to_string(),
            expected: "Dashboard".to_string(),
        };
        let prompt = context_prompt(&ctx, 3);
        assert!(prompt.starts_with("Based on this context, generate 3 test cases:"));
        assert!(prompt.contains("SubModule: Login"));
        assert!(prompt.ends_with("Expected: Dashboard"));
    }
}
