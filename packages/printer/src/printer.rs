//! Printer facade and render dispatcher

use std::cell::RefCell;
use std::sync::Arc;

use reprint_common::{ReprintError, ReprintResult};
use reprint_parser::Node;
use reprint_sourcemap::{compose_source_maps, to_json_object};
use tracing::{debug, instrument, trace};

use crate::comments::{CommentPrinter, Comments};
use crate::fast_path::FastPath;
use crate::formatter::{Formatter, GenericFormatter};
use crate::lines::Lines;
use crate::options::{normalize, Options, PartialOptions, PrintOptions, PrintOverrides};
use crate::patcher::{Patcher, Reconciler, Reprint};
use crate::print_result::{DeprecationNotice, PrintResult};

/// Where the dispatcher may take a node's text from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Reuse original text wherever the reconciler allows it
    Preserve,
    /// Format every node from rules alone
    Generic,
}

/// Prints syntax trees back to source text
///
/// The configuration is only changed for the duration of a print call
/// (guessed indentation, whitespace reuse) and restored before the call
/// returns, whether it succeeds or not. `tab_width` and `use_tabs` are
/// each guessed from the original file unless given explicitly.
pub struct Printer {
    config: RefCell<Options>,
    explicit_tab_width: bool,
    explicit_use_tabs: bool,
    reconciler: Box<dyn Reconciler>,
    formatter: Box<dyn GenericFormatter>,
    comments: Box<dyn CommentPrinter>,
    notice: Arc<DeprecationNotice>,
}

impl Printer {
    pub fn new(options: PartialOptions) -> ReprintResult<Self> {
        let explicit_tab_width = options.tab_width.is_some();
        let explicit_use_tabs = options.use_tabs.is_some();
        let mut config = normalize(&options)?;
        // per-node source identity comes from each node's loc
        config.source_file_name = None;

        Ok(Self {
            config: RefCell::new(config),
            explicit_tab_width,
            explicit_use_tabs,
            reconciler: Box::new(Patcher::new()),
            formatter: Box::new(Formatter::new()),
            comments: Box::new(Comments::new()),
            notice: DeprecationNotice::global(),
        })
    }

    pub fn with_reconciler(mut self, reconciler: impl Reconciler + 'static) -> Self {
        self.reconciler = Box::new(reconciler);
        self
    }

    pub fn with_formatter(mut self, formatter: impl GenericFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    pub fn with_comment_printer(mut self, comments: impl CommentPrinter + 'static) -> Self {
        self.comments = Box::new(comments);
        self
    }

    /// Notice fired by the string form of results from this printer
    pub fn with_deprecation_notice(mut self, notice: Arc<DeprecationNotice>) -> Self {
        self.notice = notice;
        self
    }

    /// Snapshot of the current configuration
    pub fn config(&self) -> Options {
        self.config.borrow().clone()
    }

    /// Print `ast`, keeping the original formatting of unchanged code
    #[instrument(skip_all)]
    pub fn print(&self, ast: Option<&Node>) -> ReprintResult<Arc<PrintResult>> {
        let Some(ast) = ast else {
            return Ok(PrintResult::empty());
        };

        let lines = self.print_path(&FastPath::from_root(ast), PrintOptions::root(), RenderMode::Preserve)?;

        let config = self.config();
        let generated = lines.source_map(config.source_map_name.as_deref(), config.source_root.as_deref());
        let map = compose_source_maps(config.input_source_map.as_deref(), generated)
            .map(|map| to_json_object(&map))
            .transpose()?;

        debug!(len = lines.len(), has_map = map.is_some(), "printed");
        Ok(self.result(lines.to_string_with(&config), map))
    }

    /// Print `ast` from formatting rules alone, ignoring original layout
    ///
    /// Comments are still printed, but always with canonical spacing; the
    /// whitespace around them in the original is not consulted. No source
    /// map is produced.
    #[instrument(skip_all)]
    pub fn print_generically(&self, ast: Option<&Node>) -> ReprintResult<Arc<PrintResult>> {
        let Some(ast) = ast else {
            return Ok(PrintResult::empty());
        };

        let lines = {
            let _guard = ConfigGuard::new(&self.config, |config| config.reuse_whitespace = false);
            self.print_path(&FastPath::from_root(ast), PrintOptions::root(), RenderMode::Generic)?
        };

        debug!(len = lines.len(), "printed generically");
        Ok(self.result(lines.to_string_with(&self.config.borrow()), None))
    }

    fn result(&self, code: String, map: Option<serde_json::Map<String, serde_json::Value>>) -> Arc<PrintResult> {
        Arc::new(PrintResult::new(code, map).with_notice(Arc::clone(&self.notice)))
    }

    /// Render dispatcher: print the node at `path`
    ///
    /// With `include_comments` the comment printer wraps the node and
    /// calls back here with comments turned off, so each comment is
    /// printed exactly once. Otherwise the reconciler gets the first say
    /// in [`RenderMode::Preserve`] and the generic formatter handles
    /// everything it declines.
    pub(crate) fn print_path(&self, path: &FastPath<'_>, options: PrintOptions, mode: RenderMode) -> ReprintResult<Lines> {
        let node = path.node().ok_or(ReprintError::MissingRenderTarget)?;

        if options.include_comments {
            let inner = options.with_overrides(PrintOverrides {
                include_comments: Some(false),
                ..Default::default()
            });
            let config = self.config();
            return self
                .comments
                .attach(path, &config, &|p: &FastPath<'_>| self.print_path(p, inner, mode));
        }

        let _indentation = match (&node.loc, mode) {
            (Some(loc), RenderMode::Preserve) if !(self.explicit_tab_width && self.explicit_use_tabs) => {
                let source = &loc.source;
                Some(ConfigGuard::new(&self.config, |config| {
                    if !self.explicit_tab_width {
                        config.tab_width = source.guess_tab_width();
                    }
                    if !self.explicit_use_tabs {
                        config.use_tabs = source.guess_use_tabs();
                    }
                }))
            }
            _ => None,
        };

        if mode == RenderMode::Preserve {
            if let Reprint::Reuse(reprinter) = self.reconciler.lookup(path) {
                trace!(kind = node.kind_name(), "reprinting from original");
                let config = self.config();
                return reprinter.reprint(&|p: &FastPath<'_>, o: PrintOptions| self.print_path(p, o, mode), &config);
            }
        }

        let config = self.config().merged(options);
        self.formatter.format(path, &config, &|p: &FastPath<'_>| {
            self.print_path(p, PrintOptions::root(), mode)
        })
    }
}

/// Restores the indentation settings and whitespace reuse flag on drop
struct ConfigGuard<'p> {
    config: &'p RefCell<Options>,
    tab_width: usize,
    use_tabs: bool,
    reuse_whitespace: bool,
}

impl<'p> ConfigGuard<'p> {
    fn new(config: &'p RefCell<Options>, change: impl FnOnce(&mut Options)) -> Self {
        let mut current = config.borrow_mut();
        let guard = Self {
            config,
            tab_width: current.tab_width,
            use_tabs: current.use_tabs,
            reuse_whitespace: current.reuse_whitespace,
        };
        change(&mut current);
        guard
    }
}

impl Drop for ConfigGuard<'_> {
    fn drop(&mut self) {
        let mut config = self.config.borrow_mut();
        config.tab_width = self.tab_width;
        config.use_tabs = self.use_tabs;
        config.reuse_whitespace = self.reuse_whitespace;
    }
}
