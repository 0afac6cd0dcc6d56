//! Component configuration engine for Lattice.
//!
//! This crate is the core of the Lattice configuration system:
//! tree-structured graphs of typed components, configured in one pass
//! from a flat, dotted-key configuration.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     ComponentRegistry                      │
//! │   class definitions, fields, hooks, factory index          │
//! │   (frozen behind an Arc before any tree is built)          │
//! └───────────────────────────────────────────────────────────┘
//!                             │ Arc
//!                             ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │                       ComponentTree                        │
//! │   instance arena, parent links, value maps, caches         │
//! │                                                           │
//! │   configure()  breadth-first resolver   (resolve)          │
//! │   get()/set()  four-source field lookup (tree)             │
//! │   build()      memoized factory values  (tree)             │
//! │   flatten()    dotted-path snapshots    (snapshot)         │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`registry`] | class registration, subclassing, candidate lookup |
//! | [`class`] | class builder and hook signatures |
//! | [`field`] | `Field` / `ComponentField` descriptors |
//! | [`partial`] | classes pre-bound with field overrides |
//! | [`tree`] | instance arena and field accessors |
//! | [`resolve`] | breadth-first configuration |
//! | [`snapshot`] | flattening and rendering |
//! | [`prompt`] | interactive value sources |
//! | [`error`] | `DefineError` / `ComponentError` |
//! | [`testing`] | scripted prompt for tests |
//!
//! # Example
//!
//! ```ignore
//! let mut reg = ComponentRegistry::new();
//! let dataset = reg.define_abstract("Dataset").register()?;
//! reg.define("Mnist")
//!     .extends(dataset)
//!     .field("batch_size", Field::with(TypeSpec::Int, 32))
//!     .register()?;
//! let train = reg
//!     .define("Train")
//!     .field("epochs", Field::new(TypeSpec::Int))
//!     .field("data", ComponentField::new(TypeSpec::Component(dataset)))
//!     .register()?;
//!
//! let mut tree = ComponentTree::new(reg.freeze());
//! let task = tree.instantiate(train, Conf::new())?;
//! tree.configure(task, Conf::new().with("epochs", 10).with("data.batch_size", 64))?;
//! ```

pub mod class;
pub mod error;
pub mod field;
pub mod partial;
pub mod prompt;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod testing;
pub mod tree;

pub use class::{BuildFn, ClassBuilder, ClassDef, PostConfigureFn, PreConfigureFn, RunFn};
pub use error::{ComponentError, DefineError};
pub use field::{ComponentField, Field, FieldDef, FieldSpec};
pub use partial::{PartialArg, PartialComponent};
pub use prompt::Prompt;
pub use registry::ComponentRegistry;
pub use resolve::ConfigureOptions;
pub use snapshot::Snapshot;
pub use tree::ComponentTree;
