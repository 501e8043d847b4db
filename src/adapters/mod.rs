//! External system integrations.
//!
//! - [`weread`] - WeRead web API: shelf listing and per-book annotations
//! - [`notion`] - Notion API: database pages as a sync target
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with mock implementations. The export orchestrator
//! only depends on the traits [`weread::LibrarySource`],
//! [`weread::AnnotationSource`] and [`notion::SyncTarget`].
//!
//! ```rust,no_run
//! use weread_toolbox::adapters::weread::{LibrarySource, WeReadClient};
//! use weread_toolbox::config::{secret_string, WeReadConfig};
//!
//! # async fn example() -> weread_toolbox::domain::Result<()> {
//! let config = WeReadConfig {
//!     base_url: "https://weread.qq.com".to_string(),
//!     cookie: secret_string("wr_vid=1; wr_skey=abc".to_string()),
//!     timeout_seconds: 30,
//!     retry: Default::default(),
//! };
//!
//! let client = WeReadClient::new(&config)?;
//! let library = client.fetch_library().await?;
//! println!("{} books", library.len());
//! # Ok(())
//! # }
//! ```

pub mod notion;
pub mod weread;
