//! pocogen - indentation-aware multi-file text generation
//!
//! The engine behind `pocogen-codegen`, usable on its own by any template
//! that emits block-structured source code.
//!
//! # Features
//!
//! - **Scoped writer**: [`CodeWriter`] tracks an indentation depth, re-indents
//!   multi-line fragments, and restores the depth on every exit from a block
//! - **Output context**: [`OutputContext`] maps destination keys to writers,
//!   created lazily and kept in insertion order
//! - **Staged save**: collisions are reported before anything is written,
//!   and every file is staged before any is promoted into place
//! - **Identifiers**: [`IdentifierScope`] turns raw column names into unique,
//!   legal identifiers
//!
//! # Example
//!
//! ```no_run
//! use pocogen::{IdentifierScope, NamingPolicy, OutputContext};
//!
//! fn main() -> pocogen::Result<()> {
//!     let policy = NamingPolicy::default();
//!     let mut scope = IdentifierScope::new("Person");
//!     let mut ctx = OutputContext::new();
//!
//!     let w = ctx.get_or_create("Person.cs");
//!     w.with_block("public partial class Person", |w| {
//!         let name = scope.identifier("first_name", &policy)?;
//!         w.write_line(format!("public string {} {{ get; set; }}", name));
//!         Ok::<_, pocogen::Error>(())
//!     })?;
//!
//!     ctx.save("./generated")?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
pub mod naming;
pub mod save;
pub mod writer;

pub use context::OutputContext;
pub use error::{Error, PersistenceFailure, PersistenceFailures, Result};
pub use naming::{
    FragmentCasing, IdentifierScope, NamingPolicy, ReservedWords, CSHARP_RESERVED_WORDS,
    MAX_SUFFIX_ATTEMPTS,
};
pub use save::{PlannedFile, SavePipeline, SaveReport};
pub use writer::{CodeWriter, IndentGuard};
