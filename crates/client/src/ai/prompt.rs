//! Prompt templates shared by every provider.

use bapp_core::models::Verse;

/// Scholarly analysis of a verse, or an answer to a question about it.
pub fn analyze(verse: &Verse, question: Option<&str>) -> String {
    match question.map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => format!(
            "Context: {} ({})\n\nQuestion: {question}\n\n\
             Please provide a thoughtful, scholarly answer in both Chinese and English.",
            verse.text_cn, verse.text_en
        ),
        None => format!(
            "Please provide a scholarly biblical analysis of the following verse in both Chinese and English:\n\n\
             Chinese: {}\nEnglish: {}\n\nReference: {} {}:{}\n\n\
             Include:\n\
             1. Historical and cultural context (历史与文化背景)\n\
             2. Original language insights (原文洞见)\n\
             3. Theological significance (神学意义)\n\
             4. Practical application (实际应用)\n\n\
             Please format your response clearly with headers in both languages.",
            verse.text_cn, verse.text_en, verse.book_id, verse.chapter, verse.verse
        ),
    }
}

/// A free-form question with caller-supplied context.
pub fn ask(context: &str, question: &str) -> String {
    format!(
        "Bible Context: {context}\n\nQuestion: {question}\n\n\
         Please provide a thoughtful answer in both Chinese and English, drawing from biblical scholarship and theology."
    )
}

/// Numbered context lines for a whole chapter: `N. chinese / english`.
pub fn chapter_context(verses: &[Verse]) -> String {
    verses
        .iter()
        .map(|v| format!("{}. {} / {}", v.verse, v.text_cn, v.text_en))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask for a JSON array of UI customizations.
pub fn customize(request: &str) -> String {
    format!(
        r#"You are a helpful assistant that helps users customize their Bible study app through natural language.

The user can request changes like:
- Visual changes (colors, fonts, layout)
- Behavioral changes (keyboard shortcuts, gestures)
- Feature additions (new tools, customizations)

Respond with a JSON array of changes, each with "type" ("css", "behavior" or "feature"), "description" and "code":

[
  {{
    "type": "css",
    "description": "Change background to dark blue",
    "code": "body {{ background-color: #1e3a8a; }}"
  }}
]

Only respond with valid JSON. Keep changes minimal and safe.

User request: {request}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse() -> Verse {
        Verse {
            book_id: "jhn".into(),
            chapter: 3,
            verse: 16,
            text_cn: "神爱世人".into(),
            text_en: "For God so loved the world".into(),
        }
    }

    #[test]
    fn test_analyze_without_question() {
        let prompt = analyze(&verse(), None);
        assert!(prompt.contains("Reference: jhn 3:16"));
        assert!(prompt.contains("Chinese: 神爱世人"));
    }

    #[test]
    fn test_analyze_with_question() {
        let prompt = analyze(&verse(), Some("Who is speaking?"));
        assert!(prompt.starts_with("Context: 神爱世人 (For God so loved the world)"));
        assert!(prompt.contains("Question: Who is speaking?"));

        assert_eq!(analyze(&verse(), Some("  ")), analyze(&verse(), None));
    }

    #[test]
    fn test_chapter_context_numbering() {
        let mut second = verse();
        second.verse = 17;
        let context = chapter_context(&[verse(), second]);
        let lines: Vec<_> = context.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("17. "));
    }

    #[test]
    fn test_customize_embeds_request() {
        let prompt = customize("make it dark");
        assert!(prompt.ends_with("User request: make it dark"));
        assert!(prompt.contains("body { background-color"));
    }
}
