//! Diagnostic control names.
//!
//! Every control carries a name that shows up in tree dumps and tracing
//! output. Names are snake case: lowercase ASCII letters, digits and
//! underscores, never empty. A fresh control is named after its widget
//! family and can be renamed later.

use std::fmt;

use convert_case::{Case, Casing};

use crate::{
    error::{Error, Result},
    handler::ControlKind,
};

/// True for characters a name may contain.
fn name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// A validated control name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlName(String);

impl ControlName {
    /// The default name for a widget family.
    pub fn for_kind(kind: ControlKind) -> Self {
        let name = match kind {
            ControlKind::Generic => "control",
            ControlKind::Panel => "panel",
            ControlKind::Button => "button",
            ControlKind::Border => "border",
            ControlKind::ListView => "list_view",
            ControlKind::TreeView => "tree_view",
            ControlKind::Calendar => "calendar",
            ControlKind::Window => "window",
            ControlKind::Popup => "popup",
        };
        Self(name.into())
    }

    /// Coerce an arbitrary string into a valid name. The input is snake
    /// cased, leftover invalid characters are dropped, and a string with
    /// nothing usable falls back to `control`.
    pub fn sanitize(name: &str) -> Self {
        let mut out: String = name
            .to_case(Case::Snake)
            .chars()
            .filter(|c| name_char(*c))
            .collect();
        if out.is_empty() {
            out.push_str("control");
        }
        Self(out)
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ControlName {
    type Error = Error;

    /// Accept a string that is already a valid name, without coercion.
    fn try_from(name: &str) -> Result<Self> {
        if name.is_empty() || !name.chars().all(name_char) {
            return Err(Error::Invalid(name.into()));
        }
        Ok(Self(name.into()))
    }
}

impl fmt::Display for ControlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ControlName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_defaults() {
        assert_eq!(ControlName::for_kind(ControlKind::Generic), "control");
        assert_eq!(ControlName::for_kind(ControlKind::ListView), "list_view");
        assert_eq!(ControlName::for_kind(ControlKind::Window), "window");
    }

    #[test]
    fn sanitize_coerces() {
        assert_eq!(ControlName::sanitize("SaveButton"), "save_button");
        assert_eq!(ControlName::sanitize("Popup Window"), "popup_window");
        assert_eq!(ControlName::sanitize("row 12"), "row_12");
        assert_eq!(ControlName::sanitize("!!!"), "control");
    }

    #[test]
    fn try_from_validates() {
        assert_eq!(ControlName::try_from("tree_view").unwrap(), "tree_view");
        assert!(ControlName::try_from("TreeView").is_err());
        assert!(ControlName::try_from("").is_err());
    }
}
