//! The compiled-in task list and the parent roll-up issue.

/// A single planned issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub body: String,
}

impl Task {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Identifier derived from the title prefix, e.g. `T045` for `T045: Add retention config`.
    pub fn key(&self) -> &str {
        self.title
            .split_once(':')
            .map_or(self.title.as_str(), |(key, _)| key)
    }
}

/// Checklist entry in the parent issue body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentRef {
    pub number: u64,
    pub label: String,
}

impl ParentRef {
    pub fn new(number: u64, label: impl Into<String>) -> Self {
        Self {
            number,
            label: label.into(),
        }
    }
}

/// Roll-up issue submitted after the batch.
///
/// The referenced issue numbers are taken as given; nothing checks that they
/// point at the tasks their labels name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentIssue {
    pub title: String,
    pub heading: String,
    pub checklist_caption: String,
    pub refs: Vec<ParentRef>,
}

impl ParentIssue {
    pub fn body(&self) -> String {
        let checklist: String = self
            .refs
            .iter()
            .map(|entry| format!("- [ ] #{} {}\n", entry.number, entry.label))
            .collect();
        format!(
            "**{}**\n\n{}\n{checklist}",
            self.heading, self.checklist_caption
        )
    }

    pub fn to_task(&self) -> Task {
        Task::new(self.title.clone(), self.body())
    }
}

/// Phase 1 roll-up pointing at the setup tasks, which were filed as issues #1 through #4.
pub fn default_parent() -> ParentIssue {
    ParentIssue {
        title: "Phase 1: Setup — Parent".to_owned(),
        heading: "Parent issue for Phase 1: Setup".to_owned(),
        checklist_caption: "Checklist of Phase 1 tasks:".to_owned(),
        refs: (1..=4)
            .map(|number| ParentRef::new(number, format!("T{number:03}")))
            .collect(),
    }
}

/// Remaining tasks T045 through T059, in submission order.
pub fn default_tasks() -> Vec<Task> {
    TASKS
        .iter()
        .map(|(title, body)| Task::new(*title, *body))
        .collect()
}

const TASKS: &[(&str, &str)] = &[
    (
        "T045: Add retention config and default",
        "**Phase:** Phase 7: US5 – Data retention job\n**Details:** Default 365 days\n\nCreate retention configuration.",
    ),
    (
        "T046: Implement retentionCleanup() in repository",
        "**Phase:** Phase 7: US5 – Data retention job\n\nImplement cleanup logic for old expenses.",
    ),
    (
        "T047: Invoke cleanup on app start",
        "**Phase:** Phase 7: US5 – Data retention job\n\nCall retention cleanup on application initialization.",
    ),
    (
        "T048: Unit test retention logic",
        "**Phase:** Phase 7: US5 – Data retention job\n\nAdd tests for retention cleanup.",
    ),
    (
        "T049: Add content descriptions/labels and focus order",
        "**Phase:** Phase 8: Polish & Cross-cutting\n**Details:** Accessibility improvements\n\nAdd accessibility content descriptions to UI.",
    ),
    (
        "T050: Ensure OS text scaling respected",
        "**Phase:** Phase 8: Polish & Cross-cutting\n**Details:** Text scaling\n\nRespect OS text scaling settings.",
    ),
    (
        "T051: Android manifest permissions",
        "**Phase:** Phase 8: Polish & Cross-cutting\n\nAdd required Android manifest permissions.",
    ),
    (
        "T052: iOS Info.plist usage descriptions",
        "**Phase:** Phase 8: Polish & Cross-cutting\n\nAdd required iOS Info.plist usage descriptions.",
    ),
    (
        "T053: Smoke test script notes",
        "**Phase:** Phase 8: Polish & Cross-cutting\n**Details:** Launch within 2s\n\nAdd smoke test script documentation.",
    ),
    (
        "T054: Define lightweight logging & privacy guidelines",
        "**Phase:** Phase 8: Polish & Cross-cutting\n**Details:** Avoid sensitive data\n\nCreate logging and privacy guidelines document.",
    ),
    (
        "T055: Unit test ListViewModel date switching",
        "**Phase:** Phase 9: Testing & Verification\n\nAdd tests for date switching and empty state.",
    ),
    (
        "T056: Unit test repository create/update & photo fallback",
        "**Phase:** Phase 9: Testing & Verification\n\nAdd tests for repository operations and photo fallback.",
    ),
    (
        "T057: Android instrumentation smoke test",
        "**Phase:** Phase 9: Testing & Verification\n\nAdd basic Android instrumentation tests.",
    ),
    (
        "T058: Performance timing harness",
        "**Phase:** Phase 9: Testing & Verification\n**Details:** Measure launch + date filter\n\nCreate performance measurement harness.",
    ),
    (
        "T059: Accessibility audit checklist",
        "**Phase:** Phase 9: Testing & Verification\n\nCreate accessibility audit checklist document.",
    ),
];
