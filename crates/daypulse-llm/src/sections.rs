use daypulse_types::Analysis;

const SECTION_HEADINGS: [&str; 3] = ["EXECUTIVE SUMMARY", "KEY HIGHLIGHTS", "WATCH LIST"];

/// Split the model's response into the three named sections, tolerating
/// `*`/`#` heading decoration and `---` rules. Text before any heading is
/// ignored; if no heading matched at all, the whole response becomes the
/// executive summary so the email never ships empty.
pub fn parse_sections(text: &str) -> Analysis {
    let mut executive_summary = String::new();
    let mut highlights = String::new();
    let mut watch_list = String::new();

    let mut current: Option<usize> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    let mut flush = |section: Option<usize>, lines: &mut Vec<&str>| {
        let body = lines.join("\n").trim().to_string();
        lines.clear();
        match section {
            Some(0) => executive_summary = body,
            Some(1) => highlights = body,
            Some(2) => watch_list = body,
            _ => {}
        }
    };

    for line in text.lines() {
        let stripped = line
            .trim()
            .trim_matches(|c| c == '*' || c == '#' || c == ' ');

        if let Some(index) = SECTION_HEADINGS.iter().position(|h| *h == stripped) {
            flush(current, &mut current_lines);
            current = Some(index);
        } else if line.trim() == "---" {
            continue;
        } else {
            current_lines.push(line);
        }
    }
    flush(current, &mut current_lines);

    let executive_summary = if executive_summary.is_empty() && highlights.is_empty() {
        text.trim().to_string()
    } else {
        executive_summary
    };

    Analysis {
        executive_summary,
        highlights,
        watch_list,
        full_text: text.to_string(),
    }
}
