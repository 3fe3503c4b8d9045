use protogen_config::{
    resolve, ConfigError, LazyFieldPolicy, OptionKey, RuntimeMode, TailCallTableMode,
};

#[test]
fn every_documented_option_is_applied() {
    let parameter = "dllexport_decl=ACME_EXPORT,annotate_headers,annotation_pragma_name=acme_meta,\
                     annotation_guard_name=ACME_META_GUARD,proto_h,proto_static_reflection_h,\
                     annotate_accessor,inject_field_listener_events,\
                     unverified_lazy_message_sets,experimental_tail_call_table_mode=always";
    let config = resolve(parameter, true).expect("all options are recognized");

    assert_eq!(config.export_decl, "ACME_EXPORT");
    assert!(config.capture_annotations);
    assert!(config.annotates_headers());
    assert_eq!(config.annotation_pragma.as_deref(), Some("acme_meta"));
    assert_eq!(config.annotation_guard.as_deref(), Some("ACME_META_GUARD"));
    assert!(config.emit_reflection_free_header);
    assert!(config.annotate_accessors);
    assert!(config.field_listener_scope.inject_globally);
    assert_eq!(config.lazy_field_policy, LazyFieldPolicy::UnverifiedAllowed);
    assert_eq!(config.tail_call_table_mode, TailCallTableMode::Always);
    assert_eq!(config.runtime_mode, RuntimeMode::Full);
    assert!(!config.weak_field_linking);
}

#[test]
fn scalar_options_keep_the_last_value() {
    let config = resolve(
        "dllexport_decl=FIRST,dllexport_decl=SECOND,unverified_lazy_message_sets,\
         force_eagerly_verified_lazy,experimental_tail_call_table_mode=always,\
         experimental_tail_call_table_mode=never",
        true,
    )
    .expect("resolves");

    assert_eq!(config.export_decl, "SECOND");
    assert_eq!(config.lazy_field_policy, LazyFieldPolicy::ForceEagerVerification);
    assert_eq!(config.tail_call_table_mode, TailCallTableMode::Never);
}

#[test]
fn set_valued_options_accumulate() {
    let config = resolve(
        "protos_for_field_listener_events=a.proto:b.proto,\
         protos_for_field_listener_events=c.proto,\
         forbidden_field_listener_events=serialize+clear,\
         forbidden_field_listener_events=+mutable+",
        true,
    )
    .expect("resolves");

    let scope = &config.field_listener_scope;
    let files: Vec<&str> = scope.allowed_files.iter().map(String::as_str).collect();
    assert_eq!(files, vec!["a.proto", "b.proto", "c.proto"]);
    let events: Vec<&str> = scope.forbidden_events.iter().map(String::as_str).collect();
    assert_eq!(events, vec!["clear", "mutable", "serialize"]);

    assert!(!scope.inject_globally);
    assert!(scope.injects_for("b.proto"));
    assert!(!scope.injects_for("d.proto"));
    assert!(!scope.is_event_enabled("a.proto", "clear"));
}

#[test]
fn runtime_modes_are_last_write_wins() {
    let config = resolve("lite_implicit_weak_fields=4,code_size", true).expect("resolves");
    assert_eq!(config.runtime_mode, RuntimeMode::OptimizeCodeSize);
    assert!(config.weak_field_linking);
    assert_eq!(config.requested_file_count, Some(4));
    assert!(!config.uses_weak_field_linking());

    let config = resolve("speed,lite", true).expect("resolves");
    assert_eq!(config.runtime_mode, RuntimeMode::Lite);

    let config = resolve("lite,speed", true).expect("resolves");
    assert_eq!(config.runtime_mode, RuntimeMode::OptimizeSpeed);
}

#[test]
fn weak_fields_force_lite_and_record_count() {
    let config = resolve("speed,lite_implicit_weak_fields=6", true).expect("resolves");
    assert_eq!(config.runtime_mode, RuntimeMode::Lite);
    assert!(config.uses_weak_field_linking());
    assert_eq!(config.requested_file_count, Some(6));

    let config = resolve("lite_implicit_weak_fields", true).expect("resolves");
    assert!(config.uses_weak_field_linking());
    assert_eq!(config.requested_file_count, None);
}

#[test]
fn unknown_option_names_the_key() {
    for parameter in ["frobnicate", "proto_h,frobnicate=1", "lite,,Speed"] {
        let err = resolve(parameter, false).expect_err("unknown key must fail");
        let key = parameter.rsplit(',').next().unwrap_or(parameter);
        let key = key.split('=').next().unwrap_or(key);
        assert!(matches!(err, ConfigError::UnknownOption(_)));
        assert!(err.to_string().contains(key), "{} should mention {}", err, key);
    }
}

#[test]
fn value_required_options_reject_bare_flags() {
    for key in OptionKey::all().iter().filter(|k| k.requires_value()) {
        let err = resolve(key.as_str(), true).expect_err("missing value must fail");
        match err {
            ConfigError::MissingValue(name) => assert_eq!(name, key.as_str()),
            other => panic!("expected MissingValue for {}, got {:?}", key, other),
        }
    }
}

#[test]
fn tail_call_mode_rejects_unknown_values() {
    let err = resolve("experimental_tail_call_table_mode=sometimes", true).expect_err("must fail");
    assert_eq!(
        err.to_string(),
        "Invalid value for experimental_tail_call_table_mode: sometimes"
    );
}

#[test]
fn restricted_checks_fail_in_open_source_builds() {
    for parameter in [
        "safe_boundary_check",
        "proto_h,safe_boundary_check,lite",
        "safe_boundary_check,annotate_headers,dllexport_decl=X",
    ] {
        let err = resolve(parameter, true).expect_err("open-source build must reject");
        assert!(matches!(err, ConfigError::UnsupportedOutsideControlledEnvironment(_)));
        assert!(err.to_string().contains("safe_boundary_check"));

        let config = resolve(parameter, false).expect("controlled build accepts");
        assert!(config.restricted_internal_checks);
    }
}
