use swc_core::{
    common::{SyntaxContext, DUMMY_SP},
    ecma::ast::*,
};

use crate::identity;

const WEBVIEW_MODULE: &str = "expo/dom/internal";
const DEV_SERVER_MODULE: &str = "react-native/Libraries/Core/Devtools/getDevServer";
const DEV_ROUTE_PREFIX: &str = "/_expo/@dom/";

/// Where the WebView loads the component's page from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySource {
    /// `{ uri: "www.bundle/<hash>.html" }`
    IosBundle { identity: String },
    /// `{ uri: "file:///android_asset" + "www/<hash>.html" }`
    AndroidAsset { identity: String },
    /// Resolved against the dev server when the proxy runs. The basename only
    /// makes the URL readable in the Safari debug preview.
    DevServer { basename: String, identity: String },
}

impl ProxySource {
    fn uri_expr(&self) -> Expr {
        match self {
            Self::IosBundle { identity } => str_lit(&identity::ios_bundle_uri(identity)),
            Self::AndroidAsset { identity } => add(
                str_lit(identity::ANDROID_ASSET_ROOT),
                str_lit(&identity::android_asset_path(identity)),
            ),
            Self::DevServer { basename, identity } => {
                // new URL("/_expo/@dom/<basename>?file=" + "<identity>", getDevServer().url).toString()
                let path = add(
                    str_lit(&format!("{DEV_ROUTE_PREFIX}{basename}?file=")),
                    str_lit(identity),
                );
                let get_dev_server = call(ident_expr("require"), vec![str_lit(DEV_SERVER_MODULE)]);
                let dev_server_url = member(call(get_dev_server, vec![]), "url");
                let url = Expr::New(NewExpr {
                    span: DUMMY_SP,
                    callee: Box::new(ident_expr("URL")),
                    args: Some(vec![arg(path), arg(dev_server_url)]),
                    type_args: None,
                    ctxt: SyntaxContext::empty(),
                });
                call(member(url, "toString"), vec![])
            }
        }
    }
}

/// The replacement body of a "use dom" module, in emission order:
///
/// ```js
/// import React from 'react';
/// import { WebView } from 'expo/dom/internal';
/// const source = { uri: ... };
/// export default React.forwardRef((props, ref) => {
///   return React.createElement(WebView, { ref, ...props, source });
/// });
/// ```
pub fn proxy_module_items(source: &ProxySource) -> Vec<ModuleItem> {
    vec![
        import_default("React", "react"),
        import_named("WebView", WEBVIEW_MODULE),
        source_binding(source),
        forward_ref_export(),
    ]
}

fn import_default(local: &str, src: &str) -> ModuleItem {
    import_decl(
        ImportSpecifier::Default(ImportDefaultSpecifier {
            span: DUMMY_SP,
            local: ident(local),
        }),
        src,
    )
}

fn import_named(local: &str, src: &str) -> ModuleItem {
    import_decl(
        ImportSpecifier::Named(ImportNamedSpecifier {
            span: DUMMY_SP,
            local: ident(local),
            imported: None,
            is_type_only: false,
        }),
        src,
    )
}

fn import_decl(specifier: ImportSpecifier, src: &str) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers: vec![specifier],
        src: Box::new(Str {
            span: DUMMY_SP,
            value: src.into(),
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: ImportPhase::Evaluation,
    }))
}

// const source = { uri: <expr> };
fn source_binding(source: &ProxySource) -> ModuleItem {
    let init = Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: vec![PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
            key: PropName::Ident(IdentName::new("uri".into(), DUMMY_SP)),
            value: Box::new(source.uri_expr()),
        })))],
    });
    ModuleItem::Stmt(Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span: DUMMY_SP,
        kind: VarDeclKind::Const,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name: Pat::Ident(BindingIdent {
                id: ident("source"),
                type_ann: None,
            }),
            init: Some(Box::new(init)),
            definite: false,
        }],
        ctxt: SyntaxContext::empty(),
    }))))
}

fn forward_ref_export() -> ModuleItem {
    // { ref, ...props, source }
    let props = Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props: vec![
            PropOrSpread::Prop(Box::new(Prop::Shorthand(ident("ref")))),
            PropOrSpread::Spread(SpreadElement {
                dot3_token: DUMMY_SP,
                expr: Box::new(ident_expr("props")),
            }),
            PropOrSpread::Prop(Box::new(Prop::Shorthand(ident("source")))),
        ],
    });
    let create_element = call(
        member(ident_expr("React"), "createElement"),
        vec![ident_expr("WebView"), props],
    );
    let render = Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        params: vec![binding("props"), binding("ref")],
        body: Box::new(BlockStmtOrExpr::BlockStmt(BlockStmt {
            span: DUMMY_SP,
            stmts: vec![Stmt::Return(ReturnStmt {
                span: DUMMY_SP,
                arg: Some(Box::new(create_element)),
            })],
            ctxt: SyntaxContext::empty(),
        })),
        is_async: false,
        is_generator: false,
        type_params: None,
        return_type: None,
        ctxt: SyntaxContext::empty(),
    });
    ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(ExportDefaultExpr {
        span: DUMMY_SP,
        expr: Box::new(call(member(ident_expr("React"), "forwardRef"), vec![render])),
    }))
}

// ---------- small AST builders ----------

fn ident(sym: &str) -> Ident {
    Ident::new(sym.into(), DUMMY_SP, SyntaxContext::empty())
}

fn ident_expr(sym: &str) -> Expr {
    Expr::Ident(ident(sym))
}

fn binding(sym: &str) -> Pat {
    Pat::Ident(BindingIdent {
        id: ident(sym),
        type_ann: None,
    })
}

fn str_lit(value: &str) -> Expr {
    Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    }))
}

fn arg(expr: Expr) -> ExprOrSpread {
    ExprOrSpread {
        spread: None,
        expr: Box::new(expr),
    }
}

fn add(left: Expr, right: Expr) -> Expr {
    Expr::Bin(BinExpr {
        span: DUMMY_SP,
        op: BinaryOp::Add,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj: Box::new(obj),
        prop: MemberProp::Ident(IdentName::new(prop.into(), DUMMY_SP)),
    })
}

fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        span: DUMMY_SP,
        callee: Callee::Expr(Box::new(callee)),
        args: args.into_iter().map(arg).collect(),
        type_args: None,
        ctxt: SyntaxContext::empty(),
    })
}
