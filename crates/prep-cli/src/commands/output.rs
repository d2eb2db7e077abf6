use prep_core::feedback::FeedbackReport;
use prep_core::question::Question;
use prep_core::session::Session;
use std::fmt::Write;

pub fn status_line(session: &Session) -> String {
    let (answered, total) = session.progress();
    format!(
        "{} / {}: {} ({}/{} answered)",
        session.company_name, session.role_name, session.status, answered, total
    )
}

pub fn question_line(question: &Question) -> String {
    format!(
        "[{}] ({}, {}) {}",
        question.id, question.category, question.difficulty, question.text
    )
}

pub fn feedback_report(report: &FeedbackReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Overall score: {}/100", report.overall_score);
    let _ = writeln!(out, "Performance: {}", report.performance_level);
    let d = &report.dimensions;
    let _ = writeln!(
        out,
        "Clarity {} | Relevance {} | Depth {} | Confidence {}",
        d.clarity, d.relevance, d.depth, d.confidence
    );

    for (title, items) in [
        ("Key strengths", &report.key_strengths),
        ("Priority improvements", &report.priority_improvements),
        ("Next steps", &report.next_steps),
    ] {
        if items.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}:", title);
        for item in items {
            let _ = writeln!(out, "  - {}", item);
        }
    }
    out
}
