//! Parameter string tokenizer and the closed set of recognized option keys.
//!
//! The parameter string is a comma-separated list of tokens. Each token is a
//! bare flag (`proto_h`) or a `key=value` pair split on the first `=`. Empty
//! tokens are skipped, so `a,,b` and `a,b,` are equivalent to `a,b`.

use std::fmt;
use std::str::FromStr;

use crate::ConfigError;

/// One token of the parameter string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawOption<'a> {
    /// Text before the first `=`
    pub key: &'a str,
    /// Text after the first `=`, or `None` for a bare flag
    pub value: Option<&'a str>,
}

/// Split a parameter string into ordered tokens.
pub fn parse_parameter(parameter: &str) -> Vec<RawOption<'_>> {
    parameter
        .split(',')
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) => RawOption { key, value: Some(value) },
            None => RawOption { key: token, value: None },
        })
        .collect()
}

/// Every option key the resolver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `dllexport_decl=V`
    DllexportDecl,
    /// `safe_boundary_check`
    SafeBoundaryCheck,
    /// `annotate_headers`
    AnnotateHeaders,
    /// `annotation_pragma_name=V`
    AnnotationPragmaName,
    /// `annotation_guard_name=V`
    AnnotationGuardName,
    /// `speed`
    Speed,
    /// `code_size`
    CodeSize,
    /// `lite`
    Lite,
    /// `lite_implicit_weak_fields[=N]`
    LiteImplicitWeakFields,
    /// `proto_h`
    ProtoH,
    /// `proto_static_reflection_h` (reserved, no effect)
    ProtoStaticReflectionH,
    /// `annotate_accessor`
    AnnotateAccessor,
    /// `protos_for_field_listener_events=A:B`
    ProtosForFieldListenerEvents,
    /// `inject_field_listener_events`
    InjectFieldListenerEvents,
    /// `forbidden_field_listener_events=X+Y`
    ForbiddenFieldListenerEvents,
    /// `unverified_lazy_message_sets`
    UnverifiedLazyMessageSets,
    /// `force_eagerly_verified_lazy`
    ForceEagerlyVerifiedLazy,
    /// `experimental_tail_call_table_mode=never|always`
    ExperimentalTailCallTableMode,
}

const ALL_KEYS: [OptionKey; 18] = [
    OptionKey::DllexportDecl,
    OptionKey::SafeBoundaryCheck,
    OptionKey::AnnotateHeaders,
    OptionKey::AnnotationPragmaName,
    OptionKey::AnnotationGuardName,
    OptionKey::Speed,
    OptionKey::CodeSize,
    OptionKey::Lite,
    OptionKey::LiteImplicitWeakFields,
    OptionKey::ProtoH,
    OptionKey::ProtoStaticReflectionH,
    OptionKey::AnnotateAccessor,
    OptionKey::ProtosForFieldListenerEvents,
    OptionKey::InjectFieldListenerEvents,
    OptionKey::ForbiddenFieldListenerEvents,
    OptionKey::UnverifiedLazyMessageSets,
    OptionKey::ForceEagerlyVerifiedLazy,
    OptionKey::ExperimentalTailCallTableMode,
];

impl OptionKey {
    /// Spelling used in the parameter string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::DllexportDecl => "dllexport_decl",
            OptionKey::SafeBoundaryCheck => "safe_boundary_check",
            OptionKey::AnnotateHeaders => "annotate_headers",
            OptionKey::AnnotationPragmaName => "annotation_pragma_name",
            OptionKey::AnnotationGuardName => "annotation_guard_name",
            OptionKey::Speed => "speed",
            OptionKey::CodeSize => "code_size",
            OptionKey::Lite => "lite",
            OptionKey::LiteImplicitWeakFields => "lite_implicit_weak_fields",
            OptionKey::ProtoH => "proto_h",
            OptionKey::ProtoStaticReflectionH => "proto_static_reflection_h",
            OptionKey::AnnotateAccessor => "annotate_accessor",
            OptionKey::ProtosForFieldListenerEvents => "protos_for_field_listener_events",
            OptionKey::InjectFieldListenerEvents => "inject_field_listener_events",
            OptionKey::ForbiddenFieldListenerEvents => "forbidden_field_listener_events",
            OptionKey::UnverifiedLazyMessageSets => "unverified_lazy_message_sets",
            OptionKey::ForceEagerlyVerifiedLazy => "force_eagerly_verified_lazy",
            OptionKey::ExperimentalTailCallTableMode => "experimental_tail_call_table_mode",
        }
    }

    /// Whether the option is meaningless without `=value`.
    pub fn requires_value(&self) -> bool {
        matches!(
            self,
            OptionKey::DllexportDecl
                | OptionKey::AnnotationPragmaName
                | OptionKey::AnnotationGuardName
                | OptionKey::ProtosForFieldListenerEvents
                | OptionKey::ForbiddenFieldListenerEvents
                | OptionKey::ExperimentalTailCallTableMode
        )
    }

    /// All recognized keys, in documentation order.
    pub fn all() -> &'static [OptionKey] { &ALL_KEYS }
}

impl FromStr for OptionKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownOption(s.to_string()))
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}
