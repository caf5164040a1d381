use crate::knowledge::model::KnowledgeReport;

pub fn render_text(report: &KnowledgeReport) -> String {
    let triggered = report.issues.values().filter(|e| !e.is_resolved()).count();
    let resolved = report.issues.len() - triggered;

    let mut out = String::new();
    out.push_str(&format!("{} [{}]\n", report.url, report.group));
    out.push_str(&format!(
        "Rules: {triggered} triggered, {resolved} resolved\n"
    ));
    for (rule, entry) in report.issues.iter() {
        if entry.is_resolved() {
            continue;
        }
        out.push_str(&format!(
            "  - {} [{}] ({}): {} finding(s)\n",
            rule,
            entry.severity,
            entry.category,
            entry.sub_issues.len()
        ));
        for finding in &entry.sub_issues {
            out.push_str(&format!(
                "      {}:{}:{} {}\n",
                finding.url, finding.line, finding.column, finding.text
            ));
        }
    }
    if !report.degraded.is_empty() {
        out.push_str(&format!(
            "Degraded lint calls: {}\n",
            report.degraded.len()
        ));
    }
    out
}
