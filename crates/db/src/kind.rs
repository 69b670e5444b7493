//! Resource kinds: one JSON document (and one guard) per kind.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Questions,
    FormSchema,
    Submissions,
    Users,
    Terms,
    Notifications,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        Self::Questions,
        Self::FormSchema,
        Self::Submissions,
        Self::Users,
        Self::Terms,
        Self::Notifications,
    ];

    /// File name of the kind's document inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Questions => "questions.json",
            Self::FormSchema => "form-schema.json",
            Self::Submissions => "submissions.json",
            Self::Users => "users.json",
            Self::Terms => "terms.json",
            Self::Notifications => "notifications.json",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::FormSchema => "form_schema",
            Self::Submissions => "submissions",
            Self::Users => "users",
            Self::Terms => "terms",
            Self::Notifications => "notifications",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_positions() {
        for (i, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = ResourceKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ResourceKind::ALL.len());
    }
}
