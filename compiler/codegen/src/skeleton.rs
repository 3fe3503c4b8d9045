//! Reference emission engine.
//!
//! Renders a compact declaration/definition outline for every slot kind:
//! headers declare one class per message with annotated accessors, sources
//! carry per-message definitions, the global source carries enums, services
//! and the file table, and numbered sources carry exactly one unit.

use config::{LazyFieldPolicy, TailCallTableMode};
use planner::naming::{filename_identifier, forward_decl_header_name, primary_header_name};
use planner::{LogicalUnit, SlotKind};
use schema::{ExtensionDecl, FieldDecl, MessageDecl, SchemaFile, SchemaPath};
use tracing::trace;

use crate::annotation::AnnotationSemantic;
use crate::{CodegenError, EmissionEngine, EmissionRequest, Printer, Result};

/// Field listener events the outline can track.
pub const FIELD_LISTENER_EVENTS: [&str; 5] = ["get", "set", "clear", "mutable", "serialize"];

/// Outline emitter used by the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkeletonEngine;

impl EmissionEngine for SkeletonEngine {
    fn emit(&self, request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
        trace!(file = %request.schema.name, slot = ?request.slot, "rendering outline");
        match request.slot {
            SlotKind::ForwardDeclHeader => forward_decl_header(request, p),
            SlotKind::PrimaryHeader => primary_header(request, p),
            SlotKind::SingleSource => {
                source_prologue(request, p)?;
                for (index, message) in request.schema.messages.iter().enumerate() {
                    message_definitions(request, index, message, p)?;
                }
                for (index, extension) in request.schema.extensions.iter().enumerate() {
                    extension_definition(index, extension, p)?;
                }
                global_definitions(request, p)?;
                source_epilogue(request, p)
            }
            SlotKind::GlobalSource => {
                source_prologue(request, p)?;
                global_definitions(request, p)?;
                source_epilogue(request, p)
            }
            SlotKind::IndexedSource { unit, .. } => {
                source_prologue(request, p)?;
                match unit {
                    LogicalUnit::Message(index) => {
                        let message = lookup(request, unit, &request.schema.messages, index)?;
                        message_definitions(request, index, message, p)?;
                    }
                    LogicalUnit::Extension(index) => {
                        let extension = lookup(request, unit, &request.schema.extensions, index)?;
                        extension_definition(index, extension, p)?;
                    }
                }
                source_epilogue(request, p)
            }
            SlotKind::PlaceholderSource { .. } => Ok(()),
        }
    }
}

fn lookup<'s, T>(
    request: &EmissionRequest<'_>,
    unit: LogicalUnit,
    items: &'s [T],
    index: usize,
) -> Result<&'s T> {
    items.get(index).ok_or(CodegenError::UnitOutOfRange {
        slot: request.slot,
        unit,
        available: items.len(),
    })
}

fn banner(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    p.print_with(
        "// Generated by protogen. DO NOT EDIT!\n// source: $file$\n\n",
        &[("file", &request.schema.name)],
    )
}

fn open_namespaces(schema: &SchemaFile, p: &mut Printer<'_>) -> Result<()> {
    for segment in schema.package_segments() {
        p.print_with("namespace $ns$ {\n", &[("ns", segment)])?;
    }
    p.print("\n")
}

fn close_namespaces(schema: &SchemaFile, p: &mut Printer<'_>) -> Result<()> {
    for segment in schema.package_segments().into_iter().rev() {
        p.print_with("}  // namespace $ns$\n", &[("ns", segment)])?;
    }
    Ok(())
}

fn header_guard(request: &EmissionRequest<'_>, tag: &str) -> String {
    format!("PROTOBUF_INCLUDED_{}_{}", filename_identifier(request.basename), tag)
}

fn forward_decl_header(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    let guard = header_guard(request, "PROTO_H");
    banner(request, p)?;
    p.print_with("#ifndef $guard$\n#define $guard$\n\n", &[("guard", &guard)])?;
    runtime_includes(request, p)?;
    sidecar_pragma(request, p)?;
    open_namespaces(request.schema, p)?;
    forward_declarations(request, p)?;
    close_namespaces(request.schema, p)?;
    p.print_with("\n#endif  // $guard$\n", &[("guard", &guard)])
}

fn primary_header(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    let guard = header_guard(request, "PB_H");
    banner(request, p)?;
    p.print_with("#ifndef $guard$\n#define $guard$\n\n", &[("guard", &guard)])?;
    if request.config.emit_reflection_free_header {
        let include = forward_decl_header_name(request.basename);
        p.print_with("#include \"$include$\"  // IWYU pragma: export\n", &[("include", &include)])?;
    } else {
        runtime_includes(request, p)?;
    }
    sidecar_pragma(request, p)?;
    open_namespaces(request.schema, p)?;
    if !request.config.emit_reflection_free_header {
        forward_declarations(request, p)?;
    }

    let base = if request.config.runtime_mode.is_lite() { "MessageLite" } else { "Message" };
    for (index, message) in request.schema.messages.iter().enumerate() {
        p.print("$hrule_thin$")?;
        class_declaration(request, index, message, base, p)?;
    }
    for (index, extension) in request.schema.extensions.iter().enumerate() {
        p.print_annotated(
            "extern $dllexport_decl$$pbi$::ExtensionIdentifier $name$;\n",
            &[("name", &extension.name)],
            &SchemaPath::extension(index),
            None,
        )?;
    }

    close_namespaces(request.schema, p)?;
    p.print_with("\n#endif  // $guard$\n", &[("guard", &guard)])
}

fn runtime_includes(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    let runtime =
        if request.config.runtime_mode.is_lite() { "message_lite.h" } else { "message.h" };
    let base = &request.config.runtime.include_base;
    p.print_with(
        "#include \"$base$google/protobuf/$runtime$\"\n",
        &[("base", base), ("runtime", runtime)],
    )?;
    for dependency in &request.schema.dependencies {
        let header = primary_header_name(planner::naming::strip_schema_extension(dependency));
        p.print_with("#include \"$header$\"\n", &[("header", &header)])?;
    }
    p.print("\n")
}

fn sidecar_pragma(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    let (Some(sidecar), Some(pragma)) =
        (request.annotation_sidecar, request.config.annotation_pragma.as_deref())
    else {
        return Ok(());
    };
    match request.config.annotation_guard.as_deref() {
        Some(guard) => p.print_with(
            "#ifdef $guard$\n#pragma $pragma$ \"$sidecar$\"\n#endif  // $guard$\n\n",
            &[("guard", guard), ("pragma", pragma), ("sidecar", sidecar)],
        ),
        None => p.print_with(
            "#pragma $pragma$ \"$sidecar$\"\n\n",
            &[("pragma", pragma), ("sidecar", sidecar)],
        ),
    }
}

fn forward_declarations(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    for (index, message) in request.schema.messages.iter().enumerate() {
        p.print_annotated(
            "class $name$;\n",
            &[("name", &message.name)],
            &SchemaPath::message(index),
            None,
        )?;
    }
    for (index, decl) in request.schema.enums.iter().enumerate() {
        let path = SchemaPath::enumeration(index);
        p.print_annotated("enum $name$ : int {\n", &[("name", &decl.name)], &path, None)?;
        p.indent();
        for (value_index, value) in decl.values.iter().enumerate() {
            let number = value.number.to_string();
            p.print_annotated(
                "$value$ = $number$,\n",
                &[("value", &value.name), ("number", &number)],
                &path.member(value_index),
                None,
            )?;
        }
        p.outdent();
        p.print("};\n")?;
    }
    p.print("\n")
}

fn class_declaration(
    request: &EmissionRequest<'_>,
    index: usize,
    message: &MessageDecl,
    base: &str,
    p: &mut Printer<'_>,
) -> Result<()> {
    let path = SchemaPath::message(index);
    p.print_annotated(
        "class $dllexport_decl$$name$ final : public $pb$::$base$ {\n",
        &[("name", &message.name), ("base", base)],
        &path,
        None,
    )?;
    p.print(" public:\n")?;
    p.indent();
    p.print_with("$name$();\n~$name$() override;\n", &[("name", &message.name)])?;
    listener_events(request, p)?;

    for (field_index, field) in message.fields.iter().enumerate() {
        accessor_declarations(request, &path.member(field_index), field, p)?;
    }
    p.outdent();
    p.print("};\n\n")
}

fn listener_events(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    let scope = &request.config.field_listener_scope;
    let file = &request.schema.name;
    if !scope.injects_for(file) {
        return Ok(());
    }
    let events: Vec<String> = FIELD_LISTENER_EVENTS
        .iter()
        .filter(|event| scope.is_event_enabled(file, event))
        .map(|event| format!("\"{event}\""))
        .collect();
    p.print_with(
        "static constexpr const char* kFieldListenerEvents[] = {$events$};\n",
        &[("events", &events.join(", "))],
    )
}

fn accessor_declarations(
    request: &EmissionRequest<'_>,
    path: &SchemaPath,
    field: &FieldDecl,
    p: &mut Printer<'_>,
) -> Result<()> {
    let element = cpp_type(p, &field.type_name);
    let (getter_type, scalar) = if field.repeated {
        (format!("const $pb$::RepeatedPtrField<{element}>&"), false)
    } else if is_scalar(&field.type_name)
        && !matches!(field.type_name.as_str(), "string" | "bytes")
    {
        (element.clone(), true)
    } else {
        (format!("const {element}&"), false)
    };
    // getter_type may carry `$pb$`, so substitute it through the template.
    let getter = format!("{getter_type} $name$() const;\n");
    let vars = [("name", field.name.as_str()), ("type", element.as_str())];
    let semantic = |s| request.config.annotate_accessors.then_some(s);

    p.print_annotated(&getter, &vars, path, None)?;
    if scalar {
        p.print_annotated(
            "void set_$name$($type$ value);\n",
            &vars,
            path,
            semantic(AnnotationSemantic::Set),
        )?;
    } else {
        p.print_annotated(
            "$type$* mutable_$name$();\n",
            &vars,
            path,
            semantic(AnnotationSemantic::Alias),
        )?;
    }
    p.print_annotated("void clear_$name$();\n", &vars, path, semantic(AnnotationSemantic::Set))
}

fn is_scalar(type_name: &str) -> bool { scalar_variable(type_name).is_some() }

fn scalar_variable(type_name: &str) -> Option<&'static str> {
    match type_name {
        "int32" | "sint32" | "sfixed32" => Some("int32"),
        "int64" | "sint64" | "sfixed64" => Some("int64"),
        "uint32" | "fixed32" => Some("uint32"),
        "uint64" | "fixed64" => Some("uint64"),
        "string" | "bytes" => Some("string"),
        "double" | "float" | "bool" => Some(""),
        _ => None,
    }
}

fn cpp_type(p: &Printer<'_>, type_name: &str) -> String {
    match scalar_variable(type_name) {
        Some("") => type_name.to_string(),
        Some(var) => p.vars().get(var).unwrap_or(type_name).to_string(),
        None if type_name.starts_with('.') => type_name.replace('.', "::"),
        None => type_name.to_string(),
    }
}

fn source_prologue(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    banner(request, p)?;
    let header = primary_header_name(request.basename);
    p.print_with("#include \"$header$\"\n\n", &[("header", &header)])?;
    open_namespaces(request.schema, p)
}

fn source_epilogue(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    close_namespaces(request.schema, p)
}

fn message_definitions(
    request: &EmissionRequest<'_>,
    index: usize,
    message: &MessageDecl,
    p: &mut Printer<'_>,
) -> Result<()> {
    let vars = [("name", message.name.as_str())];
    p.print("$hrule_thick$")?;
    p.print_annotated("// $name$\n", &vars, &SchemaPath::message(index), None)?;
    p.print_with("$name$::$name$() = default;\n$name$::~$name$() = default;\n", &vars)?;

    let table = match request.config.tail_call_table_mode {
        TailCallTableMode::Auto => "auto",
        TailCallTableMode::Never => "never",
        TailCallTableMode::Always => "always",
    };
    p.print_with("// parse table: tail-call $mode$\n", &[("mode", table)])?;
    if request.config.lazy_field_policy != LazyFieldPolicy::Default {
        let policy = match request.config.lazy_field_policy {
            LazyFieldPolicy::UnverifiedAllowed => "unverified lazy message sets",
            _ => "eagerly verified lazy fields",
        };
        p.print_with("// lazy fields: $policy$\n", &[("policy", policy)])?;
    }
    for field in &message.fields {
        let number = field.number.to_string();
        p.print_with(
            "// field $field$ = $number$ ($type$)\n",
            &[("field", &field.name), ("number", &number), ("type", &field.type_name)],
        )?;
    }
    p.print("\n")
}

fn extension_definition(
    index: usize,
    extension: &ExtensionDecl,
    p: &mut Printer<'_>,
) -> Result<()> {
    let number = extension.number.to_string();
    p.print_annotated(
        "$pbi$::ExtensionIdentifier $name$($number$, \"$extendee$\");\n\n",
        &[("name", &extension.name), ("number", &number), ("extendee", &extension.extendee)],
        &SchemaPath::extension(index),
        None,
    )
}

fn global_definitions(request: &EmissionRequest<'_>, p: &mut Printer<'_>) -> Result<()> {
    p.print("$hrule_thick$")?;
    for (index, decl) in request.schema.enums.iter().enumerate() {
        p.print_annotated(
            "const $string$& $name$_Name(int value);\n",
            &[("name", &decl.name)],
            &SchemaPath::enumeration(index),
            None,
        )?;
    }
    for (index, service) in request.schema.services.iter().enumerate() {
        let path = SchemaPath::service(index);
        p.print_annotated("class $name$_Stub;\n", &[("name", &service.name)], &path, None)?;
        for (method_index, method) in service.methods.iter().enumerate() {
            p.print_annotated(
                "// rpc $method$($input$) returns ($output$)\n",
                &[
                    ("method", &method.name),
                    ("input", &method.input_type),
                    ("output", &method.output_type),
                ],
                &path.member(method_index),
                None,
            )?;
        }
    }
    if !request.config.runtime_mode.is_lite() {
        let id = filename_identifier(&request.schema.name);
        p.print_with(
            "const $pbi$::DescriptorTable descriptor_table_$id$ = {\"$file$\", $messages$};\n",
            &[
                ("id", &id),
                ("file", &request.schema.name),
                ("messages", &request.schema.message_count().to_string()),
            ],
        )?;
    }
    p.print("\n")
}
