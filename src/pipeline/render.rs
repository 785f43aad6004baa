//! Rendering: map a decoded payload to ordered display sections.
//!
//! Everything here is a pure function over the payload structs (no I/O, no
//! shared state), so hosts can re-render the same result as often as they
//! like. Each format has a fixed section list; section bodies are Markdown,
//! and the `icon` field carries the feather-icon name a graphical host can
//! map to its own glyphs.
//!
//! One quirk is preserved intentionally: the task board has exactly three
//! priority columns, and tasks whose priority is anything else (`"Urgent"`,
//! `"urgent"`, `""`) are dropped from the board and its counts. See the
//! unrecognized-priority test, and DESIGN.md for why this stays.

use crate::payload::{
    ConstellationPayload, ProcessPayload, ProcessedResult, RoadmapPayload, Task, TaskPayload,
};
use serde::Serialize;

/// One renderable section: a title, an icon hint, and a Markdown body.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: String,
    /// Feather-icon name, e.g. `check-square`. Purely a hint for hosts.
    pub icon: &'static str,
    pub body: String,
}

impl Section {
    fn new(title: &str, icon: &'static str, body: String) -> Self {
        Self {
            title: title.to_string(),
            icon,
            body,
        }
    }
}

/// The three priority columns of the task board, in display order.
pub const PRIORITY_BUCKETS: [&str; 3] = ["High", "Medium", "Low"];

/// Render a decoded result into its format's ordered section list.
pub fn render(result: &ProcessedResult) -> Vec<Section> {
    match result {
        ProcessedResult::Tasks(payload) => task_sections(payload),
        ProcessedResult::Roadmap(payload) => roadmap_sections(payload),
        ProcessedResult::Process(payload) => process_sections(payload),
        ProcessedResult::Constellation(payload) => constellation_sections(payload),
    }
}

/// Assemble sections into a single Markdown document.
///
/// `## title` headings, bodies as-is, exactly one trailing newline.
pub fn assemble_document(sections: &[Section]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(sections.len());
    for section in sections {
        if section.body.is_empty() {
            parts.push(format!("## {}", section.title));
        } else {
            parts.push(format!("## {}\n\n{}", section.title, section.body));
        }
    }
    let doc = parts.join("\n\n");
    format!("{}\n", doc.trim_end())
}

// ── Tasks ────────────────────────────────────────────────────────────────

fn task_sections(payload: &TaskPayload) -> Vec<Section> {
    vec![
        Section::new("Tasks", "check-square", render_task_board(payload)),
        Section::new(
            "Next Steps",
            "arrow-right-circle",
            bullet_list(&payload.next_steps),
        ),
        Section::new("Notes", "book-open", bullet_list(&payload.notes)),
    ]
}

/// Partition tasks into the three canonical buckets.
///
/// Tasks with any other priority value do not land in any bucket.
pub fn organize_tasks(tasks: &[Task]) -> [(&'static str, Vec<&Task>); 3] {
    let mut buckets = PRIORITY_BUCKETS.map(|p| (p, Vec::new()));
    for task in tasks {
        if let Some((_, bucket)) = buckets.iter_mut().find(|(p, _)| *p == task.priority) {
            bucket.push(task);
        }
    }
    buckets
}

fn render_task_board(payload: &TaskPayload) -> String {
    let total = payload.tasks.len();
    let completed = payload.tasks.iter().filter(|t| t.is_completed()).count();
    let buckets = organize_tasks(&payload.tasks);

    let mut out = String::new();
    out.push_str(&format!("**{completed} of {total} completed**\n"));

    for (priority, tasks) in &buckets {
        out.push_str(&format!("\n### {priority} Priority ({})\n", tasks.len()));
        if tasks.is_empty() {
            out.push_str("\n_No tasks._\n");
            continue;
        }
        out.push('\n');
        for task in tasks {
            out.push_str(&render_task_item(task));
        }
    }
    out.trim_end().to_string()
}

fn render_task_item(task: &Task) -> String {
    let check = if task.is_completed() { 'x' } else { ' ' };
    let mut line = format!("- [{check}] **{}**", task.title);
    if let Some(deadline) = &task.deadline {
        line.push_str(&format!(" (due {deadline})"));
    }
    for tag in &task.tags {
        line.push_str(&format!(" `#{tag}`"));
    }
    line.push('\n');
    if let Some(description) = &task.description {
        line.push_str(&format!("  {description}\n"));
    }
    line
}

// ── Roadmap ──────────────────────────────────────────────────────────────

fn roadmap_sections(payload: &RoadmapPayload) -> Vec<Section> {
    let mut sections = vec![
        Section::new(
            "Market Analysis",
            "trending-up",
            render_roadmap_timeline(&payload.market_analysis),
        ),
        Section::new(
            "Resource Requirements",
            "package",
            render_roadmap_timeline(&payload.resource_requirements),
        ),
        Section::new(
            "Dependencies",
            "git-branch",
            render_roadmap_timeline(&payload.dependencies),
        ),
        Section::new(
            "Milestones",
            "flag",
            render_roadmap_timeline(&payload.milestones),
        ),
        Section::new(
            "Success Metrics",
            "target",
            render_roadmap_timeline(&payload.success_metrics),
        ),
    ];
    if let Some(summary) = &payload.summary {
        sections.push(Section::new("Summary", "file-text", summary.clone()));
    }
    sections
}

/// Chronological sequence of timeline entries, one block per entry.
fn render_roadmap_timeline(entries: &[crate::payload::RoadmapEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let mut header = format!("- **{}**: {}", entry.timeline, entry.title);
        if let Some(priority) = &entry.priority {
            header.push_str(&format!(" ({priority})"));
        }
        out.push_str(&header);
        out.push('\n');
        for item in &entry.content {
            out.push_str(&format!("  - {item}\n"));
        }
    }
    out.trim_end().to_string()
}

// ── Process documentation ────────────────────────────────────────────────

fn process_sections(payload: &ProcessPayload) -> Vec<Section> {
    vec![
        Section::new("Overview", "info", payload.overview.clone()),
        Section::new("Prerequisites", "list", bullet_list(&payload.prerequisites)),
        Section::new("Process Steps", "check-square", render_process_steps(payload)),
        Section::new("Important Notes", "alert-circle", bullet_list(&payload.notes)),
    ]
}

/// Sequential, numbered steps. Numbering comes from the sequence position,
/// not the backend's `number` field, so the document never skips or repeats.
fn render_process_steps(payload: &ProcessPayload) -> String {
    let mut out = String::new();
    for (index, step) in payload.steps.iter().enumerate() {
        out.push_str(&format!("{}. **{}**\n", index + 1, step.action));
        if !step.details.is_empty() {
            out.push_str(&format!("   {}\n", step.details));
        }
        if let Some(outcome) = &step.outcome {
            out.push_str(&format!("   Outcome: {outcome}\n"));
        }
    }
    out.trim_end().to_string()
}

// ── Constellation ────────────────────────────────────────────────────────

fn constellation_sections(payload: &ConstellationPayload) -> Vec<Section> {
    vec![
        Section::new("Central Theme", "star", render_central_star(payload)),
        Section::new("Orbital Insights", "circle", render_orbits(payload)),
        Section::new("Timeline", "clock", render_markers(payload)),
        Section::new("Support Elements", "help-circle", render_support(payload)),
        Section::new(
            "Patterns & Relationships",
            "git-branch",
            render_patterns(payload),
        ),
    ]
}

fn render_central_star(payload: &ConstellationPayload) -> String {
    let star = &payload.central_star;
    let mut out = format!("**{}**\n\n{}", star.title, star.description);
    if let Some(timeline) = &star.timeline {
        out.push_str(&format!("\n\nTimeline: {timeline}"));
    }
    if let Some(impact) = &star.impact {
        out.push_str(&format!("\n\nImpact: {impact}"));
    }
    out
}

fn render_orbits(payload: &ConstellationPayload) -> String {
    let mut out = String::new();
    for orbit in &payload.orbits {
        let mut header = format!("### {}", orbit.title);
        let mut badges: Vec<String> = Vec::new();
        if let Some(sentiment) = &orbit.sentiment {
            badges.push(sentiment.clone());
        }
        if let Some(priority) = &orbit.priority {
            badges.push(format!("{priority} priority"));
        }
        if !badges.is_empty() {
            header.push_str(&format!(" _({})_", badges.join(", ")));
        }
        out.push_str(&header);
        out.push('\n');
        for point in &orbit.points {
            out.push_str(&format!("- {point}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn render_markers(payload: &ConstellationPayload) -> String {
    let mut out = String::new();
    for marker in &payload.timeline {
        out.push_str(&format!("- **{}**: {}", marker.date, marker.title));
        if let Some(description) = &marker.description {
            out.push_str(&format!(" ({description})"));
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Questions and Actions sub-lists; a sub-list with no items is omitted
/// entirely rather than rendered as an empty heading.
fn render_support(payload: &ConstellationPayload) -> String {
    let support = &payload.support;
    let mut out = String::new();
    if !support.questions.is_empty() {
        out.push_str("### Questions\n\n");
        out.push_str(&bullet_list(&support.questions));
        out.push('\n');
    }
    if !support.actions.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("### Actions\n\n");
        out.push_str(&bullet_list(&support.actions));
    }
    out.trim_end().to_string()
}

fn render_patterns(payload: &ConstellationPayload) -> String {
    let mut out = String::new();
    if !payload.sentiment_patterns.is_empty() {
        out.push_str("### Sentiment Patterns\n\n");
        for pattern in &payload.sentiment_patterns {
            let confidence = (pattern.confidence * 100.0).round() as i64;
            out.push_str(&format!(
                "- {} ({confidence}%): {}\n",
                pattern.kind,
                pattern.markers.join(", ")
            ));
        }
    }
    if !payload.decision_flows.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str("### Decision Flows\n\n");
        for flow in &payload.decision_flows {
            let mut chain = vec![flow.initial.clone()];
            chain.extend(flow.progression.iter().cloned());
            if let Some(outcome) = &flow.outcome {
                chain.push(outcome.clone());
            }
            out.push_str(&format!("- {}\n", chain.join(" → ")));
        }
    }
    out.trim_end().to_string()
}

// ── Shared helpers ───────────────────────────────────────────────────────

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OutputFormat;
    use crate::payload::ProcessedResult;
    use serde_json::json;

    fn task(title: &str, priority: &str, status: Option<&str>) -> Task {
        Task {
            title: title.into(),
            priority: priority.into(),
            description: None,
            status: status.map(String::from),
            deadline: None,
            tags: Vec::new(),
        }
    }

    fn decode(format: OutputFormat, value: serde_json::Value) -> ProcessedResult {
        ProcessedResult::from_json(format, value).unwrap()
    }

    #[test]
    fn buckets_partition_by_priority() {
        let tasks = vec![
            task("a", "High", None),
            task("b", "High", Some("Completed")),
            task("c", "High", None),
            task("d", "Medium", None),
            task("e", "Medium", None),
        ];
        let buckets = organize_tasks(&tasks);
        assert_eq!(buckets[0].1.len(), 3);
        assert_eq!(buckets[1].1.len(), 2);
        assert_eq!(buckets[2].1.len(), 0);
    }

    #[test]
    fn board_header_shows_completed_ratio() {
        let payload = TaskPayload {
            tasks: vec![
                task("a", "High", Some("Completed")),
                task("b", "High", None),
                task("c", "High", None),
                task("d", "Medium", Some("Completed")),
                task("e", "Medium", None),
            ],
            next_steps: vec![],
            notes: vec![],
        };
        let board = render_task_board(&payload);
        assert!(board.starts_with("**2 of 5 completed**"), "got: {board}");
        assert!(board.contains("### High Priority (3)"));
        assert!(board.contains("### Medium Priority (2)"));
        assert!(board.contains("### Low Priority (0)"));
    }

    // Current behavior, not necessarily desired: an off-vocabulary priority
    // drops the task from every column while the header still counts it.
    #[test]
    fn unrecognized_priority_is_dropped_from_all_buckets() {
        let tasks = vec![
            task("a", "High", None),
            task("b", "Urgent", None),
            task("c", "low", None),
        ];
        let buckets = organize_tasks(&tasks);
        let filed: usize = buckets.iter().map(|(_, b)| b.len()).sum();
        assert_eq!(filed, 1);
    }

    #[test]
    fn task_sections_are_ordered() {
        let result = decode(
            OutputFormat::Tasks,
            json!({"tasks": [], "next_steps": ["call Sam"], "notes": []}),
        );
        let sections = render(&result);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Tasks", "Next Steps", "Notes"]);
        assert_eq!(sections[1].body, "- call Sam");
    }

    #[test]
    fn roadmap_sections_follow_canonical_order() {
        let entry = json!([{"title": "Sizing", "timeline": "Q1", "content": ["a", "b"], "priority": "High"}]);
        let result = decode(
            OutputFormat::Roadmap,
            json!({
                "market_analysis": entry,
                "resource_requirements": [],
                "dependencies": [],
                "milestones": [],
                "success_metrics": [],
            }),
        );
        let sections = render(&result);
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Market Analysis",
                "Resource Requirements",
                "Dependencies",
                "Milestones",
                "Success Metrics"
            ]
        );
        assert!(sections[0].body.contains("**Q1**: Sizing (High)"));
        assert!(sections[0].body.contains("  - a"));
    }

    #[test]
    fn roadmap_summary_appends_extra_section() {
        let result = decode(
            OutputFormat::Roadmap,
            json!({
                "market_analysis": [],
                "resource_requirements": [],
                "dependencies": [],
                "milestones": [],
                "success_metrics": [],
                "summary": "Ship in Q1."
            }),
        );
        let sections = render(&result);
        assert_eq!(sections.last().unwrap().title, "Summary");
        assert_eq!(sections.last().unwrap().body, "Ship in Q1.");
    }

    #[test]
    fn process_steps_are_numbered_sequentially() {
        let result = decode(
            OutputFormat::Process,
            json!({
                "overview": "How we deploy.",
                "prerequisites": ["access"],
                "steps": [
                    {"action": "Build", "details": "run the pipeline"},
                    {"number": 9, "action": "Verify", "details": "", "outcome": "green dashboard"}
                ],
                "notes": []
            }),
        );
        let sections = render(&result);
        let steps = &sections[2].body;
        assert!(steps.contains("1. **Build**"));
        assert!(steps.contains("2. **Verify**"), "got: {steps}");
        assert!(steps.contains("Outcome: green dashboard"));
    }

    #[test]
    fn constellation_support_omits_empty_sublists() {
        let result = decode(
            OutputFormat::Constellation,
            json!({
                "central_star": {"title": "Launch", "description": "d"},
                "support": {"questions": [], "actions": ["Schedule shoot"]}
            }),
        );
        let sections = render(&result);
        let support = sections.iter().find(|s| s.title == "Support Elements").unwrap();
        assert!(!support.body.contains("Questions"));
        assert!(support.body.contains("### Actions"));
        assert!(support.body.contains("- Schedule shoot"));
    }

    #[test]
    fn constellation_patterns_render_confidence_percent() {
        let result = decode(
            OutputFormat::Constellation,
            json!({
                "central_star": {"title": "t", "description": "d"},
                "sentiment_patterns": [
                    {"type": "positive", "markers": ["great", "love it"], "confidence": 0.854}
                ],
                "decision_flows": [
                    {"initial": "December", "progression": ["slipped"], "final": "January"}
                ]
            }),
        );
        let sections = render(&result);
        let patterns = &sections.last().unwrap().body;
        assert!(patterns.contains("positive (85%): great, love it"));
        assert!(patterns.contains("December → slipped → January"));
    }

    #[test]
    fn document_assembly_ends_with_single_newline() {
        let sections = vec![
            Section::new("Tasks", "check-square", "**0 of 0 completed**".into()),
            Section::new("Notes", "book-open", String::new()),
        ];
        let doc = assemble_document(&sections);
        assert!(doc.starts_with("## Tasks"));
        assert!(doc.contains("## Notes"));
        assert!(doc.ends_with('\n'));
        assert!(!doc.ends_with("\n\n"));
    }
}
