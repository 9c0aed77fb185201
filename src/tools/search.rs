//! Process-wide search capability, built on first use.

use std::sync::{Arc, OnceLock};

use super::Tool;

type Constructor = Box<dyn Fn() -> anyhow::Result<Arc<dyn Tool>> + Send + Sync>;

/// Lazily constructed search tool shared by every request.
///
/// The constructor runs at most once. A failed construction is remembered,
/// so later callers get `None` without retrying.
pub struct SearchCapability {
    cell: OnceLock<Option<Arc<dyn Tool>>>,
    construct: Constructor,
}

impl SearchCapability {
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn() -> anyhow::Result<Arc<dyn Tool>> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            construct: Box::new(construct),
        }
    }

    /// DuckDuckGo search returning at most `max_results` hits.
    #[cfg(feature = "web-search")]
    pub fn duckduckgo(max_results: usize) -> Self {
        Self::new(move || {
            let tool = super::WebSearch::new(max_results)?;
            Ok(Arc::new(tool) as Arc<dyn Tool>)
        })
    }

    /// Without the `web-search` feature there is nothing to build.
    #[cfg(not(feature = "web-search"))]
    pub fn duckduckgo(_max_results: usize) -> Self {
        Self::unavailable()
    }

    /// A capability that never yields a tool.
    pub fn unavailable() -> Self {
        Self::new(|| Err(anyhow::anyhow!("web search is not compiled into this build")))
    }

    /// The search tool, constructing it on first call.
    pub fn get(&self) -> Option<Arc<dyn Tool>> {
        self.cell
            .get_or_init(|| match (self.construct)() {
                Ok(tool) => {
                    tracing::info!(tool = tool.name(), "Search capability ready");
                    Some(tool)
                }
                Err(e) => {
                    tracing::warn!("Search capability unavailable, continuing without it: {}", e);
                    None
                }
            })
            .clone()
    }

    /// Whether construction has been attempted yet.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for SearchCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.cell.get() {
            None => "pending",
            Some(Some(_)) => "ready",
            Some(None) => "unavailable",
        };
        f.debug_struct("SearchCapability").field("state", &state).finish()
    }
}
