//! Instruction text sent to the model for one document.

use crate::template::Template;

const PREAMBLE: &str = "You are an expert at extracting data from documents and organising it as JSON.\n\
Analyse the document text below and extract its key information.";

const TEMPLATE_RULES: &[&str] = &[
    "**Exact structure**: your reply MUST follow exactly the JSON structure given below. \
     Keep every key and the nesting unchanged; do not add or remove keys.",
    "**Data types**: keep the value types shown in the structure. Do not quote numbers.",
    "**Missing data**: if a piece of information is not in the text, use the value `null` \
     for that key (not the string \"null\").",
    "**Dates**: where a date is expected, format it as YYYY-MM-DD if possible.",
];

const FREEFORM_RULES: &[&str] = &[
    "**Choose a logical structure**: design a clear, hierarchical JSON structure that \
     organises the information in the document sensibly.",
    "**Missing data**: if a piece of information is not in the text, use the value `null` \
     for that key.",
    "**Dates**: format dates as YYYY-MM-DD where possible.",
];

const CLEAN_REPLY_RULE: &str = "**JSON only**: your reply must contain ONLY the JSON. \
Do not explain your reasoning, add comments, or wrap it in ```json fences.";

/// Builds the instruction for one document.
///
/// With a template the model is told to fill exactly that shape, and the
/// template text is embedded verbatim. Without one the model picks the
/// structure itself. Pure function: no I/O.
///
/// # Examples
///
/// ```
/// use pdfjson_extraction::{build_instruction, Template};
///
/// let template = Template::from_text(r#"{"name": "", "date": ""}"#);
/// let prompt = build_instruction("Name: Alice, Date: 2024-01-01", Some(&template));
/// assert!(prompt.contains("\"name\""));
/// assert!(prompt.contains("\"date\""));
/// ```
#[must_use]
pub fn build_instruction(document_text: &str, template: Option<&Template>) -> String {
    let rules = if template.is_some() {
        TEMPLATE_RULES
    } else {
        FREEFORM_RULES
    };

    let mut prompt = format!("{PREAMBLE}\n\nIMPORTANT RULES:\n");
    for (i, rule) in rules.iter().chain(std::iter::once(&CLEAN_REPLY_RULE)).enumerate() {
        prompt.push_str(&format!("{}. {rule}\n", i + 1));
    }

    if let Some(template) = template {
        prompt.push_str("\n---\nJSON STRUCTURE TO POPULATE:\n");
        prompt.push_str(template.as_str().trim_end());
        prompt.push('\n');
    }

    prompt.push_str("---\nDOCUMENT TEXT TO ANALYSE:\n");
    prompt.push_str(document_text.trim_end());
    prompt.push_str("\n---\n");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_keys_appear_literally() {
        let template = Template::from_text(r#"{"name": "", "date": ""}"#);
        let prompt = build_instruction("Name: Alice, Date: 2024-01-01", Some(&template));

        assert!(prompt.contains(r#""name""#));
        assert!(prompt.contains(r#""date""#));
        assert!(prompt.contains("JSON STRUCTURE TO POPULATE"));
        assert!(prompt.contains("Exact structure"));
        assert!(prompt.contains("Name: Alice, Date: 2024-01-01"));
    }

    #[test]
    fn test_freeform_asks_model_to_choose_structure() {
        let prompt = build_instruction("Invoice 42", None);

        assert!(prompt.contains("Choose a logical structure"));
        assert!(!prompt.contains("JSON STRUCTURE TO POPULATE"));
        assert!(prompt.contains("Invoice 42"));
    }

    #[test]
    fn test_both_modes_demand_json_only() {
        let template = Template::from_text("{}");
        for prompt in [
            build_instruction("x", None),
            build_instruction("x", Some(&template)),
        ] {
            assert!(prompt.contains("JSON only"));
            assert!(prompt.contains("Do not explain your reasoning"));
            assert!(prompt.contains("`null`"));
        }
    }

    #[test]
    fn test_rules_are_numbered_consecutively() {
        let prompt = build_instruction("x", None);
        assert!(prompt.contains("\n1. "));
        assert!(prompt.contains("\n4. **JSON only**"));

        let template = Template::from_text("{}");
        let prompt = build_instruction("x", Some(&template));
        assert!(prompt.contains("\n5. **JSON only**"));
    }

    #[test]
    fn test_sections_are_delimited() {
        let template = Template::from_text("{\"a\": 1}\n\n");
        let prompt = build_instruction("body text\n", Some(&template));

        assert!(prompt.starts_with(PREAMBLE));
        assert!(prompt.contains("\n---\nJSON STRUCTURE TO POPULATE:\n{\"a\": 1}\n---\n"));
        assert!(prompt.ends_with("DOCUMENT TEXT TO ANALYSE:\nbody text\n---\n"));
    }

    #[test]
    fn test_document_follows_template() {
        let template = Template::from_text(r#"{"total": 0}"#);
        let prompt = build_instruction("Total: 10", Some(&template));
        let template_at = prompt.find(r#"{"total": 0}"#).unwrap();
        let document_at = prompt.find("Total: 10").unwrap();
        assert!(template_at < document_at);
    }
}
