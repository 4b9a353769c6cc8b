//! Rewrites files marked with `"use dom"` into a WebView proxy module.

use std::path::{Path, PathBuf};

use serde_json::Value;
use swc_core::{
    common::{Span, Spanned},
    ecma::{
        ast::*,
        visit::{Visit, VisitWith},
    },
};

use crate::{
    config::{BuildContext, Platform},
    error::{DomDirectiveError, Result},
    identity,
    proxy::{proxy_module_items, ProxySource},
};

pub const USE_DOM_DIRECTIVE: &str = "use dom";

/// Metadata key under which the unit identity is published.
pub const DOM_COMPONENT_REFERENCE_KEY: &str = "expoDomComponentReference";

/// Per-file state handed over by the host.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub filename: Option<PathBuf>,
    pub metadata: Value,
}

impl SourceFile {
    pub fn new(filename: Option<impl Into<PathBuf>>) -> Self {
        Self {
            filename: filename.map(Into::into),
            metadata: Value::Object(Default::default()),
        }
    }

    /// The identity recorded by a successful rewrite.
    pub fn dom_component_reference(&self) -> Option<&str> {
        self.metadata.get(DOM_COMPONENT_REFERENCE_KEY)?.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    Untouched,
    Rewritten { reference: String },
}

/// Replace the body of a `"use dom"` file with its proxy.
///
/// The tree is left as it was whenever an error is returned.
pub fn rewrite(program: &mut Program, file: &mut SourceFile, ctx: &BuildContext) -> Result<RewriteOutcome> {
    // Native only.
    if ctx.is_web() {
        tracing::trace!("skipping \"use dom\" rewrite on web");
        return Ok(RewriteOutcome::Untouched);
    }
    if !has_use_dom_directive(program) {
        return Ok(RewriteOutcome::Untouched);
    }

    let filename = match file.filename.as_deref() {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => {
            return Err(DomDirectiveError::Configuration(
                "expected a filename to be set for the file being transformed".into(),
            ))
        }
    };

    let module = match program {
        Program::Module(module) => module,
        // Scripts cannot export anything.
        Program::Script(script) => return Err(DomDirectiveError::MissingExport { span: script.span }),
    };
    check_export_shape(module)?;

    let reference = identity::file_url(&filename, ctx.cwd.as_deref())?;
    let source = proxy_source(ctx, &filename, &reference)?;

    let Value::Object(metadata) = &mut file.metadata else {
        return Err(DomDirectiveError::Metadata);
    };

    module.body = proxy_module_items(&source);
    metadata.insert(
        DOM_COMPONENT_REFERENCE_KEY.to_string(),
        Value::String(reference.clone()),
    );

    tracing::debug!(
        reference = %reference,
        production = ctx.is_production,
        "rewrote \"use dom\" module into a WebView proxy"
    );
    Ok(RewriteOutcome::Rewritten { reference })
}

/// Whether the directive prologue contains `"use dom"`.
pub fn has_use_dom_directive(program: &Program) -> bool {
    match program {
        Program::Module(module) => directive_prologue(module.body.iter().map(|item| match item {
            ModuleItem::Stmt(stmt) => Some(stmt),
            ModuleItem::ModuleDecl(_) => None,
        })),
        Program::Script(script) => directive_prologue(script.body.iter().map(Some)),
    }
}

fn directive_prologue<'a>(stmts: impl Iterator<Item = Option<&'a Stmt>>) -> bool {
    for stmt in stmts {
        let Some(Stmt::Expr(ExprStmt { expr, .. })) = stmt else {
            return false;
        };
        let Expr::Lit(Lit::Str(s)) = &**expr else {
            return false;
        };
        if directive_text(s) == USE_DOM_DIRECTIVE {
            return true;
        }
    }
    false
}

// Directives match on their source text, so escapes like `'use\x20dom'` do not count.
fn directive_text(s: &Str) -> String {
    match &s.raw {
        Some(raw) => {
            let raw = raw.to_string();
            raw.get(1..raw.len().saturating_sub(1))
                .unwrap_or_default()
                .to_string()
        }
        None => s.value.to_string(),
    }
}

fn proxy_source(ctx: &BuildContext, filename: &Path, reference: &str) -> Result<ProxySource> {
    if !ctx.is_production {
        let basename = filename
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return Ok(ProxySource::DevServer {
            basename,
            identity: reference.to_string(),
        });
    }
    // The export step writes the page to the same hashed path.
    match &ctx.platform {
        Some(Platform::Ios) => Ok(ProxySource::IosBundle {
            identity: reference.to_string(),
        }),
        Some(Platform::Android) => Ok(ProxySource::AndroidAsset {
            identity: reference.to_string(),
        }),
        other => Err(DomDirectiveError::UnsupportedPlatform {
            platform: other
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "undefined".to_string()),
        }),
    }
}

fn check_export_shape(module: &Module) -> Result<()> {
    let mut scan = ExportScan::default();
    module.visit_with(&mut scan);
    if let Some(span) = scan.unsupported {
        return Err(DomDirectiveError::UnsupportedExport { span });
    }
    if !scan.has_default {
        return Err(DomDirectiveError::MissingExport { span: module.span });
    }
    Ok(())
}

#[derive(Default)]
struct ExportScan {
    has_default: bool,
    /// First named export seen.
    unsupported: Option<Span>,
}

impl Visit for ExportScan {
    fn visit_module_decl(&mut self, n: &ModuleDecl) {
        match n {
            ModuleDecl::ExportDefaultDecl(_) | ModuleDecl::ExportDefaultExpr(_) => {
                self.has_default = true;
            }
            // `export * from` stays allowed; `export * as ns from` is `ExportNamed`.
            ModuleDecl::ExportDecl(_) | ModuleDecl::ExportNamed(_) => {
                self.unsupported.get_or_insert(n.span());
            }
            _ => {}
        }
    }
}
