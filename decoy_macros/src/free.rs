use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};

use crate::signature::{Args, Declaration, Kind, Mocked};

/// A list of free function declarations.
pub struct Functions {
    fns: Vec<Declaration>,
}

impl Parse for Functions {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut fns = vec![];
        while !input.is_empty() {
            fns.push(input.parse()?);
        }
        Ok(Functions { fns })
    }
}

impl Functions {
    /// Each function reports to a process-wide binding.
    pub fn expand_mocks(self) -> darling::Result<TokenStream> {
        self.expand(|declaration, mocked| {
            let Declaration { attrs, vis, .. } = declaration;
            let sig = &mocked.sig;
            let binding = format_ident!("{}", mocked.binding.to_uppercase());
            let marker = format_ident!("__Decoy_{}", mocked.binding);
            let prototype = mocked.prototype();
            let doc = format!("Binding of `{prototype}`.");
            let markers = mocked.marker_items(&marker, &vis);
            let body = mocked.intercept(quote! { &#binding });

            quote! {
                #markers

                #[doc = #doc]
                #vis static #binding: ::decoy::Binding<#marker> = ::decoy::Binding::new_static(#prototype);

                #(#attrs)*
                #vis #sig {
                    #body
                }
            }
        })
    }

    /// Each function forwards to whatever its proxy is connected to.
    pub fn expand_proxies(self) -> darling::Result<TokenStream> {
        self.expand(|declaration, mocked| {
            let Declaration { attrs, vis, .. } = declaration;
            let sig = &mocked.sig;
            let proxy = format_ident!("{}_PROXY", mocked.binding.to_uppercase());
            let prototype = mocked.prototype();
            let doc = format!("Forwarding target of `{prototype}`.");

            let lifetimes: Vec<_> = sig.generics.lifetimes().map(|lt| &lt.lifetime).collect();
            let higher_ranked = if lifetimes.is_empty() {
                quote! {}
            } else {
                quote! { for<#(#lifetimes),*> }
            };
            let unsafety = &sig.unsafety;
            let abi = &sig.abi;
            let arg_types = mocked.arg_types();
            let output = &sig.output;
            let idents = mocked.arg_idents();

            quote! {
                #[doc = #doc]
                #vis static #proxy: ::decoy::Proxy<#higher_ranked #unsafety #abi fn(#(#arg_types),*) #output> =
                    ::decoy::Proxy::new(#prototype);

                #(#attrs)*
                #vis #sig {
                    (#proxy.subject())(#(#idents),*)
                }
            }
        })
    }

    fn expand(
        self,
        mut generate: impl FnMut(Declaration, &Mocked) -> TokenStream,
    ) -> darling::Result<TokenStream> {
        let mut errors = darling::Error::accumulator();
        let mut bound = HashSet::new();
        let mut items = vec![];

        for mut declaration in self.fns {
            let Some(args) = errors.handle(Args::extract(&mut declaration.attrs)) else {
                continue;
            };
            let Some(mocked) =
                errors.handle(Mocked::new(declaration.sig.clone(), &args, Kind::Free))
            else {
                continue;
            };

            if !bound.insert(mocked.binding.clone()) {
                errors.push(
                    darling::Error::custom(format!(
                        "decoy: `{}` is declared twice, tell the overloads apart with #[decoy(suffix = \"...\")]",
                        mocked.binding
                    ))
                    .with_span(&declaration.sig.ident),
                );
                continue;
            }

            items.push(generate(declaration, &mocked));
        }

        errors.finish_with(quote! { #(#items)* })
    }
}
