use std::collections::BTreeSet;
use std::fmt;

/// Semantic category of an operand, as named in the command catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OperandType {
    /// Matches everything. Also what unknown catalogue type names become.
    Wildcard,
    Scalar,
    Bool,
    String,
    Array,
    HashMap,
    Code,
    Object,
    Group,
    Side,
    Config,
    Control,
    Display,
    Location,
    Namespace,
    Script,
    Task,
    Text,
    StructuredText,
    TeamMember,
    DiaryRecord,
    NetObject,
    // Values produced by control-structure builders
    If,
    For,
    Switch,
    While,
    With,
    Exception,
}

impl OperandType {
    /// Map a catalogue type token (case-insensitive). Never fails: anything
    /// unrecognized is a wildcard.
    pub fn from_catalogue(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "scalar" | "number" | "nan" => OperandType::Scalar,
            "bool" | "boolean" => OperandType::Bool,
            "string" => OperandType::String,
            "array" => OperandType::Array,
            "hashmap" => OperandType::HashMap,
            "code" => OperandType::Code,
            "object" => OperandType::Object,
            "group" => OperandType::Group,
            "side" => OperandType::Side,
            "config" => OperandType::Config,
            "control" => OperandType::Control,
            "display" => OperandType::Display,
            "location" => OperandType::Location,
            "namespace" => OperandType::Namespace,
            "script" => OperandType::Script,
            "task" => OperandType::Task,
            "text" => OperandType::Text,
            "structuredtext" | "structured_text" => OperandType::StructuredText,
            "team_member" | "teammember" => OperandType::TeamMember,
            "diary_record" | "diaryrecord" => OperandType::DiaryRecord,
            "netobject" => OperandType::NetObject,
            "if" | "if_type" => OperandType::If,
            "for" | "for_type" => OperandType::For,
            "switch" | "switch_type" => OperandType::Switch,
            "while" | "while_type" => OperandType::While,
            "with" | "with_type" => OperandType::With,
            "exception" | "exception_handle" => OperandType::Exception,
            _ => OperandType::Wildcard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OperandType::Wildcard => "Any",
            OperandType::Scalar => "Number",
            OperandType::Bool => "Boolean",
            OperandType::String => "String",
            OperandType::Array => "Array",
            OperandType::HashMap => "HashMap",
            OperandType::Code => "Code",
            OperandType::Object => "Object",
            OperandType::Group => "Group",
            OperandType::Side => "Side",
            OperandType::Config => "Config",
            OperandType::Control => "Control",
            OperandType::Display => "Display",
            OperandType::Location => "Location",
            OperandType::Namespace => "Namespace",
            OperandType::Script => "Script",
            OperandType::Task => "Task",
            OperandType::Text => "Text",
            OperandType::StructuredText => "Structured Text",
            OperandType::TeamMember => "Team Member",
            OperandType::DiaryRecord => "Diary Record",
            OperandType::NetObject => "NetObject",
            OperandType::If => "If Type",
            OperandType::For => "For Type",
            OperandType::Switch => "Switch Type",
            OperandType::While => "While Type",
            OperandType::With => "With Type",
            OperandType::Exception => "Exception Type",
        }
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arity {
    Nullary,
    Unary,
    Binary,
}

/// A built-in command and the operand shapes it can be used with.
/// Commands overloaded across arities (`count`, `-`) list all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    pub name: String,
    pub arities: BTreeSet<Arity>,
}

impl CommandDescriptor {
    pub fn new(name: &str) -> Self {
        CommandDescriptor {
            name: name.to_string(),
            arities: BTreeSet::new(),
        }
    }

    pub fn supports(&self, arity: Arity) -> bool {
        self.arities.contains(&arity)
    }
}

/// Accepted operand types per side, unioned over every catalogue line of
/// the same command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperandSets {
    pub left: BTreeSet<OperandType>,
    pub right: BTreeSet<OperandType>,
}

impl OperandSets {
    pub fn accepts_left(&self, ty: OperandType) -> bool {
        accepts(&self.left, ty)
    }

    pub fn accepts_right(&self, ty: OperandType) -> bool {
        accepts(&self.right, ty)
    }
}

/// Wildcards on either side always match; an empty set constrains nothing.
pub fn accepts(set: &BTreeSet<OperandType>, ty: OperandType) -> bool {
    ty == OperandType::Wildcard
        || set.is_empty()
        || set.contains(&OperandType::Wildcard)
        || set.contains(&ty)
}

/// "Number, String" style listing for messages.
pub fn describe_set(set: &BTreeSet<OperandType>) -> String {
    set.iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_names_are_case_insensitive() {
        assert_eq!(OperandType::from_catalogue("SCALAR"), OperandType::Scalar);
        assert_eq!(OperandType::from_catalogue("scalar"), OperandType::Scalar);
        assert_eq!(OperandType::from_catalogue("NaN"), OperandType::Scalar);
        assert_eq!(OperandType::from_catalogue("Bool"), OperandType::Bool);
    }

    #[test]
    fn unknown_names_become_wildcard() {
        assert_eq!(OperandType::from_catalogue("ANY"), OperandType::Wildcard);
        assert_eq!(OperandType::from_catalogue("EDEN_ENTITY"), OperandType::Wildcard);
        assert_eq!(OperandType::from_catalogue(""), OperandType::Wildcard);
    }

    #[test]
    fn wildcard_operand_matches_any_set() {
        let set: BTreeSet<_> = [OperandType::Scalar].into_iter().collect();
        assert!(accepts(&set, OperandType::Wildcard));
        assert!(accepts(&set, OperandType::Scalar));
        assert!(!accepts(&set, OperandType::String));
    }

    #[test]
    fn wildcard_in_set_matches_any_operand() {
        let set: BTreeSet<_> = [OperandType::Scalar, OperandType::Wildcard]
            .into_iter()
            .collect();
        assert!(accepts(&set, OperandType::Code));
    }

    #[test]
    fn empty_set_is_unconstrained() {
        assert!(accepts(&BTreeSet::new(), OperandType::Object));
    }

    #[test]
    fn descriptor_tracks_arities() {
        let mut d = CommandDescriptor::new("count");
        d.arities.insert(Arity::Unary);
        d.arities.insert(Arity::Binary);
        assert!(d.supports(Arity::Unary));
        assert!(d.supports(Arity::Binary));
        assert!(!d.supports(Arity::Nullary));
    }

    #[test]
    fn describe_set_lists_in_order() {
        let set: BTreeSet<_> = [OperandType::String, OperandType::Scalar]
            .into_iter()
            .collect();
        assert_eq!(describe_set(&set), "Number, String");
    }
}
