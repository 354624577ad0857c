//! Generation of statically-typed C# GraphQL clients.
//!
//! The input is a [`ClientModel`][descriptors::ClientModel]: descriptors of every class,
//! enum, input, operation and result parser a client needs, as decided by the analysis
//! of a schema and its operation documents. Each descriptor becomes one C# source file.
//!
//! ```
//! use gqlforge_codegen::descriptors::ClientModel;
//! use gqlforge_codegen::generators::generate_client;
//! use gqlforge_codegen::CodegenOptions;
//! use gqlforge_scalars::Scalars;
//!
//! let model = ClientModel::from_json_str(r#"{
//!     "client": { "name": "EmptyClient", "operations": [] }
//! }"#).unwrap();
//! let options = CodegenOptions::new().namespace("Demo");
//! let files = generate_client(&model, &Scalars::default(), &options).unwrap();
//! let names: Vec<_> = files.iter().map(|file| file.file_name.as_str()).collect();
//! assert_eq!(
//!     names,
//!     ["IEmptyClient.cs", "EmptyClient.cs", "EmptyClientServiceCollectionExtensions.cs"]
//! );
//! ```

mod config;
pub mod descriptors;
mod error;
pub mod generators;
pub mod result_parser;
pub mod schema;
pub mod type_lookup;
mod writer;

pub use self::config::CodegenOptions;
pub use self::error::CodegenError;
pub use self::generators::generate_client;
pub use self::generators::CodeGenerator;
pub use self::generators::GeneratedFile;
pub use self::type_lookup::TypeInfo;
pub use self::type_lookup::TypeLookup;
pub use self::writer::quote;
pub use self::writer::verbatim;
pub use self::writer::CodeWriter;
