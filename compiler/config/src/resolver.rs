//! Resolves a parameter string into a [`GeneratorConfiguration`].
//!
//! Options are applied left to right. Scalar settings keep the last value
//! written; the field listener allow-list and forbidden-event set accumulate.
//! Conflicting runtime modes are not rejected: the last one wins and the
//! override is logged.

use tracing::{debug, warn};

use crate::generator_config::{
    GeneratorConfiguration, LazyFieldPolicy, RuntimeContext, RuntimeMode, TailCallTableMode,
};
use crate::options::{parse_parameter, OptionKey, RawOption};
use crate::ConfigError;

/// Resolve `parameter` for a build whose runtime is (or is not) the
/// externally distributed one.
pub fn resolve(parameter: &str, open_source: bool) -> Result<GeneratorConfiguration, ConfigError> {
    resolve_with(parameter, RuntimeContext { open_source, ..RuntimeContext::default() })
}

/// Resolve `parameter` against a full runtime context.
pub fn resolve_with(
    parameter: &str,
    runtime: RuntimeContext,
) -> Result<GeneratorConfiguration, ConfigError> {
    let mut config = GeneratorConfiguration { runtime, ..GeneratorConfiguration::default() };
    let mut mode_source: Option<OptionKey> = None;

    for option in parse_parameter(parameter) {
        let key: OptionKey = option.key.parse()?;
        apply(&mut config, key, option, &mut mode_source)?;
    }

    if config.restricted_internal_checks && config.runtime.open_source {
        return Err(ConfigError::UnsupportedOutsideControlledEnvironment(
            OptionKey::SafeBoundaryCheck.as_str().to_string(),
        ));
    }

    if config.weak_field_linking && !config.runtime_mode.is_lite() {
        warn!(
            mode = %config.runtime_mode,
            "lite_implicit_weak_fields overridden by a later runtime mode; \
             sources will not be split"
        );
    }

    debug!(?config, "resolved generator configuration");
    Ok(config)
}

fn apply(
    config: &mut GeneratorConfiguration,
    key: OptionKey,
    option: RawOption<'_>,
    mode_source: &mut Option<OptionKey>,
) -> Result<(), ConfigError> {
    let value = match option.value {
        Some(value) => value,
        None if key.requires_value() => {
            return Err(ConfigError::MissingValue(key.as_str().to_string()))
        }
        None => "",
    };

    match key {
        OptionKey::DllexportDecl => config.export_decl = value.to_string(),
        OptionKey::SafeBoundaryCheck => config.restricted_internal_checks = true,
        OptionKey::AnnotateHeaders => config.capture_annotations = true,
        OptionKey::AnnotationPragmaName => config.annotation_pragma = Some(value.to_string()),
        OptionKey::AnnotationGuardName => config.annotation_guard = Some(value.to_string()),
        OptionKey::Speed => set_mode(config, RuntimeMode::OptimizeSpeed, key, mode_source),
        OptionKey::CodeSize => set_mode(config, RuntimeMode::OptimizeCodeSize, key, mode_source),
        OptionKey::Lite => set_mode(config, RuntimeMode::Lite, key, mode_source),
        OptionKey::LiteImplicitWeakFields => {
            set_mode(config, RuntimeMode::Lite, key, mode_source);
            config.weak_field_linking = true;
            if !value.is_empty() {
                config.requested_file_count = parse_file_count(key, value)?;
            }
        }
        OptionKey::ProtoH => config.emit_reflection_free_header = true,
        OptionKey::ProtoStaticReflectionH => {}
        OptionKey::AnnotateAccessor => config.annotate_accessors = true,
        OptionKey::ProtosForFieldListenerEvents => config
            .field_listener_scope
            .allowed_files
            .extend(value.split(':').filter(|f| !f.is_empty()).map(str::to_string)),
        OptionKey::InjectFieldListenerEvents => {
            config.field_listener_scope.inject_globally = true
        }
        OptionKey::ForbiddenFieldListenerEvents => config
            .field_listener_scope
            .forbidden_events
            .extend(value.split('+').filter(|e| !e.is_empty()).map(str::to_string)),
        OptionKey::UnverifiedLazyMessageSets => {
            config.lazy_field_policy = LazyFieldPolicy::UnverifiedAllowed
        }
        OptionKey::ForceEagerlyVerifiedLazy => {
            config.lazy_field_policy = LazyFieldPolicy::ForceEagerVerification
        }
        OptionKey::ExperimentalTailCallTableMode => {
            config.tail_call_table_mode = match value {
                "never" => TailCallTableMode::Never,
                "always" => TailCallTableMode::Always,
                other => {
                    return Err(ConfigError::InvalidValue {
                        key: key.as_str().to_string(),
                        value: other.to_string(),
                    })
                }
            }
        }
    }

    if option.value.is_some() && !key.requires_value() && key != OptionKey::LiteImplicitWeakFields
    {
        debug!(option = key.as_str(), "ignoring value given to a flag option");
    }
    Ok(())
}

fn set_mode(
    config: &mut GeneratorConfiguration,
    mode: RuntimeMode,
    key: OptionKey,
    mode_source: &mut Option<OptionKey>,
) {
    if let Some(previous) = mode_source {
        if config.runtime_mode != mode {
            warn!(
                earlier = previous.as_str(),
                later = key.as_str(),
                "conflicting runtime mode options; the later one wins"
            );
        }
    }
    config.runtime_mode = mode;
    *mode_source = Some(key);
}

/// `0` means "no explicit count".
fn parse_file_count(key: OptionKey, value: &str) -> Result<Option<usize>, ConfigError> {
    let count: usize = value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.as_str().to_string(),
        value: value.to_string(),
    })?;
    Ok((count > 0).then_some(count))
}
