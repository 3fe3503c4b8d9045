//! Schema file declarations.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One parsed schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SchemaFile {
    /// File identity as seen by the compiler (e.g. "acme/orders.proto")
    pub name: String,
    /// Declared package (e.g. "acme.orders"); empty for the root package
    #[serde(default)]
    pub package: String,
    /// Imported files, in import order
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Top-level messages in declaration order
    #[serde(default)]
    pub messages: Vec<MessageDecl>,
    /// Top-level enums in declaration order
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    /// Services in declaration order
    #[serde(default)]
    pub services: Vec<ServiceDecl>,
    /// Top-level extensions in declaration order
    #[serde(default)]
    pub extensions: Vec<ExtensionDecl>,
}

/// A message declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageDecl {
    /// Message name without package qualification
    pub name: String,
    /// Fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// A message field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Field number
    pub number: i32,
    /// Scalar keyword or fully-qualified message/enum name
    pub type_name: String,
    /// Whether the field is repeated
    #[serde(default)]
    pub repeated: bool,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnumDecl {
    /// Enum name
    pub name: String,
    /// Values in declaration order
    #[serde(default)]
    pub values: Vec<EnumValueDecl>,
}

/// One enum value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EnumValueDecl {
    /// Value name
    pub name: String,
    /// Numeric value
    pub number: i32,
}

/// A service declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceDecl {
    /// Service name
    pub name: String,
    /// Methods in declaration order
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A service method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Request message type
    pub input_type: String,
    /// Response message type
    pub output_type: String,
}

/// A top-level extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtensionDecl {
    /// Extension name
    pub name: String,
    /// Fully-qualified name of the extended message
    pub extendee: String,
    /// Field number within the extendee
    pub number: i32,
    /// Scalar keyword or fully-qualified type name
    pub type_name: String,
}

impl SchemaFile {
    /// Create an empty schema file with the given identity.
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into(), ..Self::default() } }

    /// Number of top-level messages.
    pub fn message_count(&self) -> usize { self.messages.len() }

    /// Number of top-level extensions.
    pub fn extension_count(&self) -> usize { self.extensions.len() }

    /// Package segments, e.g. `["acme", "orders"]`.
    pub fn package_segments(&self) -> Vec<&str> {
        self.package.split('.').filter(|s| !s.is_empty()).collect()
    }

    /// Load a schema description from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let schema: Self = serde_json::from_str(&content)?;
        Ok(schema)
    }

    /// Save the schema description as pretty JSON.
    pub fn to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        use std::io::Write;
        writeln!(file)?;
        Ok(())
    }
}

impl MessageDecl {
    /// Message with the given name and fields.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDecl>) -> Self {
        Self { name: name.into(), fields }
    }
}

impl FieldDecl {
    /// Singular field.
    pub fn new(name: impl Into<String>, number: i32, type_name: impl Into<String>) -> Self {
        Self { name: name.into(), number, type_name: type_name.into(), repeated: false }
    }
}

impl ExtensionDecl {
    /// Extension of `extendee` with the given number and type.
    pub fn new(
        name: impl Into<String>,
        extendee: impl Into<String>,
        number: i32,
        type_name: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), extendee: extendee.into(), number, type_name: type_name.into() }
    }
}
