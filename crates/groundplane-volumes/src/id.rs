//! Volume ID codec
//!
//! Volume identities are strings of the form
//! `projects/{project}/volumes/{name}`. Parsing is strict: every segment
//! must be present and non-empty, and errors name the missing piece.

use std::fmt;

use crate::error::VolumesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeId {
    pub project_id: String,
    pub name: String,
}

impl VolumeId {
    pub fn new(project_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            name: name.into(),
        }
    }

    /// Parses a volume ID into its components.
    pub fn parse(input: &str) -> Result<Self, VolumesError> {
        let invalid = |reason: &str| VolumesError::InvalidId {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let segments: Vec<&str> = input.split('/').collect();
        if segments.len() != 4 {
            return Err(invalid(
                "expected the format projects/{project}/volumes/{name}",
            ));
        }
        if segments[0] != "projects" {
            return Err(invalid("missing the 'projects' segment"));
        }
        if segments[2] != "volumes" {
            return Err(invalid("missing the 'volumes' segment"));
        }
        if segments[1].is_empty() {
            return Err(invalid("the project segment is empty"));
        }
        if segments[3].is_empty() {
            return Err(invalid("the volume name segment is empty"));
        }

        Ok(Self::new(segments[1], segments[3]))
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/volumes/{}", self.project_id, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_and_parses_round_trip() {
        let id = VolumeId::new("acme", "data-01");
        let formatted = id.to_string();
        assert_eq!(formatted, "projects/acme/volumes/data-01");
        assert_eq!(VolumeId::parse(&formatted).unwrap(), id);
    }

    #[test]
    fn rejects_malformed_input() {
        let cases = [
            "",
            "projects/acme",
            "projects/acme/volumes",
            "projects//volumes/data-01",
            "projects/acme/volumes/",
            "project/acme/volumes/data-01",
            "projects/acme/disks/data-01",
            "projects/acme/volumes/data-01/extra",
        ];
        for input in cases {
            assert!(
                VolumeId::parse(input).is_err(),
                "expected {input:?} to fail"
            );
        }
    }

    #[test]
    fn parse_errors_name_the_problem() {
        let err = VolumeId::parse("projects/acme/disks/data-01").unwrap_err();
        assert!(err.to_string().contains("volumes"));
    }
}
