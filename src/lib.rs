//! SWC plugin that turns modules marked with `"use dom"` into native proxies.
//!
//! On iOS and Android a file starting with the directive is replaced by a
//! module that renders a WebView pointing at the file's own page: the dev
//! server route in development, or the exported `<sha1>.html` asset in
//! production. Web builds are left untouched.

use swc_core::{
    common::{
        comments::{Comment, CommentKind, Comments},
        errors::HANDLER,
        Spanned, DUMMY_SP,
    },
    ecma::ast::Program,
    plugin::{
        metadata::TransformPluginMetadataContextKind,
        plugin_transform,
        proxies::{PluginCommentsProxy, TransformPluginProgramMetadata},
    },
};

pub mod config;
pub mod error;
pub mod identity;
pub mod proxy;
pub mod rewrite;

pub use config::{BuildContext, Platform, PluginConfig};
pub use error::DomDirectiveError;
pub use rewrite::{
    has_use_dom_directive, rewrite, RewriteOutcome, SourceFile, DOM_COMPONENT_REFERENCE_KEY,
    USE_DOM_DIRECTIVE,
};

// -----------------------------------------------------------------------------
// Entrypoint
// -----------------------------------------------------------------------------

#[plugin_transform]
pub fn process_transform(mut program: Program, metadata: TransformPluginProgramMetadata) -> Program {
    let config = PluginConfig::from_json(metadata.get_transform_plugin_config().as_deref());
    let env_name = metadata.get_context(&TransformPluginMetadataContextKind::Env);
    let cwd = metadata.get_context(&TransformPluginMetadataContextKind::Cwd);
    let ctx = BuildContext::resolve(&config, env_name.as_deref(), cwd.as_deref());

    let mut file = SourceFile::new(metadata.get_context(&TransformPluginMetadataContextKind::Filename));

    match rewrite(&mut program, &mut file, &ctx) {
        Ok(RewriteOutcome::Rewritten { reference }) => {
            publish_reference(&program, metadata.comments.as_ref(), &reference);
        }
        Ok(RewriteOutcome::Untouched) => {}
        Err(err) => report(&err),
    }
    program
}

/// SWC has no per-file metadata record, so the reference rides along as a
/// leading comment of the module for the export step to pick up.
fn publish_reference(program: &Program, comments: Option<&PluginCommentsProxy>, reference: &str) {
    let span = program.span();
    let Some(comments) = comments else {
        return;
    };
    if span.is_dummy() {
        return;
    }
    comments.add_leading(
        span.lo,
        Comment {
            kind: CommentKind::Block,
            span: DUMMY_SP,
            text: format!(" {DOM_COMPONENT_REFERENCE_KEY}: {reference} ").into(),
        },
    );
}

fn report(err: &DomDirectiveError) {
    let msg = err.to_string();
    HANDLER.with(|handler| match err.span() {
        Some(span) => handler.struct_span_err(span, &msg).emit(),
        None => handler.err(&msg),
    });
}
