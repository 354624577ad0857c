//! Options shared by every generator.

use crate::CodegenError;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;

/// Where generated code lives and how it is laid out.
///
/// Loadable from JSON, for example a `gqlforge.json` next to the operation documents:
///
/// ```
/// use gqlforge_codegen::CodegenOptions;
///
/// let options = CodegenOptions::from_json_str(r#"{ "namespace": "StarWars.Client" }"#).unwrap();
/// assert_eq!(options.namespace, "StarWars.Client");
/// assert_eq!(options.indent_prefix, "    ");
///
/// let options = CodegenOptions::new().namespace("Demo").indent_prefix("\t");
/// assert_eq!(options.indent_prefix, "\t");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CodegenOptions {
    /// Namespace of every generated type
    pub namespace: String,

    /// Repeated once per indentation level
    pub indent_prefix: String,

    /// Namespace of the client runtime types (`IValueSerializer`, `IOperation<T>`, ...)
    pub runtime_namespace: String,

    /// Extra `using` directives, after the default ones
    pub usings: Vec<String>,

    /// Comment placed at the top of each file. `None` uses a default "generated" notice.
    pub file_header: Option<String>,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            namespace: "GqlForge.Generated".to_owned(),
            indent_prefix: "    ".to_owned(),
            runtime_namespace: "GqlForge.Client".to_owned(),
            usings: Vec::new(),
            file_header: None,
        }
    }
}

impl CodegenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CodegenError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CodegenError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the indentation unit. The default is four spaces.
    pub fn indent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.indent_prefix = prefix.into();
        self
    }

    pub fn runtime_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.runtime_namespace = namespace.into();
        self
    }

    /// Adds a `using` directive to every file
    pub fn using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    pub fn file_header(mut self, header: impl Into<String>) -> Self {
        self.file_header = Some(header.into());
        self
    }

    /// `using` directives of every file, defaults first
    pub(crate) fn all_usings(&self) -> Vec<&str> {
        let mut usings = vec![
            "System",
            "System.Collections.Generic",
            "System.Text.Json",
            "System.Threading",
            "System.Threading.Tasks",
            self.runtime_namespace.as_str(),
        ];
        for using in &self.usings {
            if !usings.contains(&using.as_str()) {
                usings.push(using);
            }
        }
        usings
    }
}
