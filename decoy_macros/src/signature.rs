use darling::FromMeta;
use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::{parse_quote, visit_mut::VisitMut};

use crate::prototype;

/// Options of a single mocked function: `#[decoy(suffix = "...")]`.
#[derive(Default, FromMeta)]
#[darling(default)]
pub struct Args {
    suffix: Option<String>,
}

impl Args {
    /// Removes every `#[decoy(..)]` from `attrs` and merges them.
    pub fn extract(attrs: &mut Vec<syn::Attribute>) -> darling::Result<Self> {
        let mut args = Args::default();
        let mut errors = darling::Error::accumulator();
        attrs.retain(|attr| {
            if !attr.path().is_ident("decoy") {
                return true;
            }
            if let Some(parsed) = errors.handle(Args::from_meta(&attr.meta)) {
                args.suffix = parsed.suffix.or(args.suffix.take());
            }
            false
        });
        errors.finish_with(args)
    }
}

/// A function declaration without a body, as written inside the macros.
pub struct Declaration {
    pub attrs: Vec<syn::Attribute>,
    pub vis: syn::Visibility,
    pub sig: syn::Signature,
}

impl syn::parse::Parse for Declaration {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let attrs = input.call(syn::Attribute::parse_outer)?;
        let vis = input.parse()?;
        let sig: syn::Signature = input.parse()?;
        if input.peek(syn::token::Brace) {
            return Err(syn::Error::new(
                sig.ident.span(),
                "decoy: mocked functions are declared without a body, end the declaration with `;`",
            ));
        }
        input.parse::<syn::Token![;]>()?;
        Ok(Declaration { attrs, vis, sig })
    }
}

/// Whether the function being mocked is a method of a double or a
/// free function.
#[derive(Clone, Copy)]
pub enum Kind<'a> {
    Method {
        owner: &'a syn::Ident,
        trait_: Option<&'a syn::Path>,
    },
    Free,
}

/// A validated signature and everything derived from it.
pub struct Mocked {
    pub sig: syn::Signature,
    pub binding: String,
    args: Vec<(syn::Ident, syn::Type)>,
    prototype: String,
    params: Vec<syn::Type>,
    captures: Vec<TokenStream>,
    hook_args: Vec<syn::Type>,
    output: Option<syn::Type>,
    shared: bool,
}

impl Mocked {
    pub fn new(mut sig: syn::Signature, args: &Args, kind: Kind) -> darling::Result<Self> {
        validate(&sig, kind)?;
        normalize_idents(&mut sig);

        let binding = match &args.suffix {
            Some(suffix) => format!("{}_{}", sig.ident, suffix),
            None => sig.ident.to_string(),
        };

        let args: Vec<_> = sig
            .inputs
            .iter()
            .filter_map(|a| match a {
                syn::FnArg::Receiver(_) => None,
                syn::FnArg::Typed(arg) => Some(arg),
            })
            .map(|arg| match arg.pat.as_ref() {
                syn::Pat::Ident(pat) => (pat.ident.clone(), arg.ty.as_ref().clone()),
                _ => unreachable!("arguments are normalized to identifiers"),
            })
            .collect();

        let output = match &sig.output {
            syn::ReturnType::Default => None,
            syn::ReturnType::Type(_, ty) => Some(ty.as_ref()),
        };

        let prototype = prototype::render(
            output,
            &sig.ident,
            args.iter().map(|(_, ty)| ty),
            sig.generics.where_clause.as_ref(),
        );

        let mut unself = match kind {
            Kind::Method { owner, trait_ } => Some(Unself { owner, trait_ }),
            Kind::Free => None,
        };
        let mut owned = Relifetime::new("static", true);
        let mut borrowed = Relifetime::new("_", false);
        let mut rewrite = |mut ty: syn::Type, relifetime: &mut Relifetime| {
            if let Some(unself) = &mut unself {
                unself.visit_type_mut(&mut ty);
            }
            relifetime.visit_type_mut(&mut ty);
            ty
        };

        let params = args
            .iter()
            .map(|(_, ty)| rewrite(decay(ty), &mut owned))
            .collect();
        let captures = args.iter().map(|(ident, ty)| capture(ident, ty)).collect();
        let hook_args = args
            .iter()
            .map(|(_, ty)| rewrite(ty.clone(), &mut borrowed))
            .collect();
        let output = output.map(|ty| rewrite(ty.clone(), &mut owned));

        Ok(Mocked {
            sig,
            binding,
            args,
            prototype,
            params,
            captures,
            hook_args,
            output,
            shared: matches!(kind, Kind::Free),
        })
    }

    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// The marker type implementing `decoy::Signature` for this function.
    /// Free functions get thread-safe hooks so their bindings can be
    /// `static`.
    pub fn marker_items(&self, marker: &syn::Ident, vis: &syn::Visibility) -> TokenStream {
        let params = &self.params;
        let hook_args = &self.hook_args;
        let (output, ret) = match &self.output {
            Some(ty) => (quote! { ::decoy::Returns<#ty> }, quote! { #ty }),
            None => (quote! { ::decoy::Void }, quote! { () }),
        };
        let threads = if self.shared {
            quote! { + ::std::marker::Send + ::std::marker::Sync }
        } else {
            quote! {}
        };

        quote! {
            #[doc(hidden)]
            #[allow(non_camel_case_types)]
            #vis enum #marker {}

            impl ::decoy::Signature for #marker {
                type Params = (#(#params,)*);
                type Output = #output;
                type Hook = dyn ::std::ops::Fn(#(#hook_args),*) -> #ret #threads;
            }

            impl<F> ::decoy::IntoHook<F> for #marker
            where
                F: ::std::ops::Fn(#(#hook_args),*) -> #ret #threads + 'static,
            {
                fn into_hook(hook: F) -> ::std::sync::Arc<Self::Hook> {
                    ::std::sync::Arc::new(hook)
                }
            }
        }
    }

    /// Routes one call through the binding `binding` evaluates to.
    pub fn intercept(&self, binding: TokenStream) -> TokenStream {
        let hook = format_ident!("__decoy_hook");
        let idents = self.args.iter().map(|(ident, _)| ident);
        let capture = if self.captures.is_empty() {
            quote! {}
        } else {
            let captures = &self.captures;
            quote! { .capture((#(#captures,)*)) }
        };

        quote! {
            ::decoy::Intercept::new(#binding)
                #capture
                .resolve(|#hook| #hook(#(#idents),*))
        }
    }

    pub fn arg_idents(&self) -> impl Iterator<Item = &syn::Ident> {
        self.args.iter().map(|(ident, _)| ident)
    }

    pub fn arg_types(&self) -> impl Iterator<Item = &syn::Type> {
        self.args.iter().map(|(_, ty)| ty)
    }
}

fn validate(sig: &syn::Signature, kind: Kind) -> darling::Result<()> {
    let mut errors = darling::Error::accumulator();

    if let Some(asyncness) = &sig.asyncness {
        errors.push(
            darling::Error::custom("decoy: async functions cannot be mocked").with_span(asyncness),
        );
    }
    if let Some(constness) = &sig.constness {
        errors.push(
            darling::Error::custom("decoy: const functions cannot be mocked").with_span(constness),
        );
    }
    if let Some(variadic) = &sig.variadic {
        errors.push(
            darling::Error::custom("decoy: variadic functions cannot be mocked").with_span(variadic),
        );
    }
    for param in &sig.generics.params {
        match param {
            syn::GenericParam::Lifetime(_) => {}
            generic => errors.push(
                darling::Error::custom(
                    "decoy: only lifetime parameters are supported on mocked functions",
                )
                .with_span(generic),
            ),
        }
    }
    for input in &sig.inputs {
        if let syn::FnArg::Typed(arg) = input {
            if contains_impl_trait(&arg.ty) {
                errors.push(
                    darling::Error::custom("decoy: `impl Trait` arguments cannot be mocked")
                        .with_span(&arg.ty),
                );
            }
        }
    }
    if let syn::ReturnType::Type(_, ty) = &sig.output {
        if contains_impl_trait(ty) {
            errors.push(
                darling::Error::custom("decoy: `impl Trait` return types cannot be mocked")
                    .with_span(ty),
            );
        }
    }

    match (kind, sig.receiver()) {
        (Kind::Method { .. }, None) => errors.push(
            darling::Error::custom(
                "decoy: doubles only mock methods, add a `self` receiver or use `decoy::function!`",
            )
            .with_span(&sig.ident),
        ),
        (Kind::Free, Some(receiver)) => errors.push(
            darling::Error::custom("decoy: free functions cannot take `self`")
                .with_span(receiver),
        ),
        _ => {}
    }

    errors.finish()
}

fn contains_impl_trait(ty: &syn::Type) -> bool {
    struct Finder(bool);

    impl<'ast> syn::visit::Visit<'ast> for Finder {
        fn visit_type_impl_trait(&mut self, _: &'ast syn::TypeImplTrait) {
            self.0 = true;
        }
    }

    let mut finder = Finder(false);
    syn::visit::Visit::visit_type(&mut finder, ty);
    finder.0
}

fn normalize_idents(signature: &mut syn::Signature) {
    signature
        .inputs
        .iter_mut()
        .filter_map(|a| match a {
            syn::FnArg::Receiver(_) => None,
            syn::FnArg::Typed(arg) => Some(arg.pat.as_mut()),
        })
        .enumerate()
        .for_each(|(i, arg_pat)| match arg_pat {
            syn::Pat::Ident(pat_ident) => {
                pat_ident.by_ref = None;
                pat_ident.mutability = None;
                pat_ident.subpat = None;
            }
            other => {
                *other = syn::Pat::Ident(syn::PatIdent {
                    attrs: vec![],
                    by_ref: None,
                    mutability: None,
                    subpat: None,
                    ident: syn::Ident::new(&format!("_decoy_arg_{i}"), Span::call_site()),
                })
            }
        });
}

/// The owned type a parameter is stored as: references become what
/// `ToOwned` makes of their target, everything else is kept.
fn decay(ty: &syn::Type) -> syn::Type {
    match ty {
        syn::Type::Reference(reference) => {
            let elem = &reference.elem;
            parse_quote! { <#elem as ::std::borrow::ToOwned>::Owned }
        }
        syn::Type::Paren(paren) => decay(&paren.elem),
        syn::Type::Group(group) => decay(&group.elem),
        ty => ty.clone(),
    }
}

fn capture(ident: &syn::Ident, ty: &syn::Type) -> TokenStream {
    match ty {
        syn::Type::Paren(paren) => capture(ident, &paren.elem),
        syn::Type::Group(group) => capture(ident, &group.elem),
        syn::Type::Reference(_) => quote! { ::std::borrow::ToOwned::to_owned(&*#ident) },
        _ => quote! { ::std::clone::Clone::clone(&#ident) },
    }
}

/// Replaces `Self` with the double it stands for, since markers are
/// declared outside of the impl block. Associated types go through the
/// implemented trait.
struct Unself<'a> {
    owner: &'a syn::Ident,
    trait_: Option<&'a syn::Path>,
}

impl VisitMut for Unself<'_> {
    fn visit_type_mut(&mut self, ty: &mut syn::Type) {
        if let syn::Type::Path(syn::TypePath { qself: None, path }) = ty {
            if path.segments.first().map_or(false, |first| first.ident == "Self") {
                let owner = self.owner;
                let rest = syn::Path {
                    leading_colon: None,
                    segments: path.segments.iter().skip(1).cloned().collect(),
                };
                *ty = match (rest.segments.is_empty(), self.trait_) {
                    (true, _) => parse_quote! { #owner },
                    (false, Some(trait_)) => parse_quote! { <#owner as #trait_>::#rest },
                    (false, None) => parse_quote! { #owner::#rest },
                };
            }
        }
        syn::visit_mut::visit_type_mut(self, ty);
    }
}

/// Rewrites types so they can be named outside of the mocked function:
/// every lifetime other than `'static` becomes `lifetime`. With
/// `elided_references` set, elided reference lifetimes are made explicit
/// too.
struct Relifetime {
    lifetime: syn::Lifetime,
    elided_references: bool,
}

impl Relifetime {
    fn new(lifetime: &str, elided_references: bool) -> Self {
        Relifetime {
            lifetime: syn::Lifetime::new(&format!("'{lifetime}"), Span::call_site()),
            elided_references,
        }
    }
}

impl VisitMut for Relifetime {
    fn visit_lifetime_mut(&mut self, lifetime: &mut syn::Lifetime) {
        if lifetime.ident != "static" {
            *lifetime = self.lifetime.clone();
        }
    }

    fn visit_type_reference_mut(&mut self, reference: &mut syn::TypeReference) {
        if reference.lifetime.is_none() && self.elided_references {
            reference.lifetime = Some(self.lifetime.clone());
        }
        syn::visit_mut::visit_type_reference_mut(self, reference);
    }
}
