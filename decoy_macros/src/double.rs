use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::parse::{Parse, ParseStream};

use crate::signature::{Args, Declaration, Kind, Mocked};

/// `struct Name; impl [Trait for] Name { fn ..; }*`
pub struct Double {
    attrs: Vec<syn::Attribute>,
    vis: syn::Visibility,
    ident: syn::Ident,
    impls: Vec<Block>,
}

struct Block {
    attrs: Vec<syn::Attribute>,
    unsafety: Option<syn::Token![unsafe]>,
    trait_: Option<syn::Path>,
    self_ty: syn::Ident,
    types: Vec<syn::ImplItemType>,
    fns: Vec<Declaration>,
}

impl Parse for Double {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(syn::Attribute::parse_outer)?;
        let vis = input.parse()?;
        input.parse::<syn::Token![struct]>()?;
        let ident: syn::Ident = input.parse()?;
        if input.peek(syn::Token![<]) {
            return Err(input.error("decoy: doubles cannot be generic"));
        }
        input.parse::<syn::Token![;]>()?;

        let mut impls = vec![];
        while !input.is_empty() {
            impls.push(input.parse()?);
        }

        Ok(Double {
            attrs,
            vis,
            ident,
            impls,
        })
    }
}

impl Parse for Block {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let attrs = input.call(syn::Attribute::parse_outer)?;
        let unsafety = input.parse()?;
        input.parse::<syn::Token![impl]>()?;
        if input.peek(syn::Token![<]) {
            return Err(input.error("decoy: impl blocks of a double cannot be generic"));
        }

        let path: syn::Path = input.parse()?;
        let (trait_, self_ty) = if input.peek(syn::Token![for]) {
            input.parse::<syn::Token![for]>()?;
            (Some(path), input.parse()?)
        } else {
            match path.get_ident() {
                Some(ident) => (None, ident.clone()),
                None => {
                    return Err(syn::Error::new_spanned(
                        path,
                        "decoy: inherent impl blocks must name the double",
                    ))
                }
            }
        };

        let content;
        syn::braced!(content in input);
        let mut types = vec![];
        let mut fns = vec![];
        while !content.is_empty() {
            let ahead = content.fork();
            ahead.call(syn::Attribute::parse_outer)?;
            ahead.parse::<syn::Visibility>()?;
            if ahead.peek(syn::Token![type]) {
                types.push(content.parse()?);
            } else {
                fns.push(content.parse()?);
            }
        }

        Ok(Block {
            attrs,
            unsafety,
            trait_,
            self_ty,
            types,
            fns,
        })
    }
}

impl Double {
    pub fn expand(self) -> darling::Result<TokenStream> {
        let Double {
            attrs,
            vis,
            ident,
            impls,
        } = self;

        let mut errors = darling::Error::accumulator();
        let mut bound = HashSet::new();
        let mut fields = vec![];
        let mut markers = vec![];
        let mut prototypes = vec![];
        let mut items = vec![];

        for block in impls {
            if block.self_ty != ident {
                errors.push(
                    darling::Error::custom(format!(
                        "decoy: impl blocks inside this double must be for `{ident}`"
                    ))
                    .with_span(&block.self_ty),
                );
                continue;
            }

            let mut methods = vec![];
            for mut declaration in block.fns {
                let Some(args) = errors.handle(Args::extract(&mut declaration.attrs)) else {
                    continue;
                };
                let name = declaration.sig.ident.clone();
                let kind = Kind::Method {
                    owner: &ident,
                    trait_: block.trait_.as_ref(),
                };
                let Some(mocked) = errors.handle(Mocked::new(declaration.sig, &args, kind)) else {
                    continue;
                };

                if !bound.insert(mocked.binding.clone()) {
                    errors.push(
                        darling::Error::custom(format!(
                            "decoy: `{}` is bound twice in `{ident}`, tell the overloads apart with #[decoy(suffix = \"...\")]",
                            mocked.binding
                        ))
                        .with_span(&name),
                    );
                    continue;
                }

                let field = format_ident!("{}", mocked.binding);
                let marker = format_ident!("__Decoy_{}_{}", ident, mocked.binding);
                let body = mocked.intercept(quote! { &self.#field });
                let Declaration {
                    attrs: fn_attrs,
                    vis: fn_vis,
                    ..
                } = declaration;
                let sig = &mocked.sig;

                methods.push(quote! {
                    #(#fn_attrs)*
                    #fn_vis #sig {
                        #body
                    }
                });
                markers.push(mocked.marker_items(&marker, &syn::Visibility::Inherited));
                prototypes.push(mocked.prototype().to_string());
                fields.push((field, marker));
            }

            let head = match &block.trait_ {
                Some(trait_) => quote! { #trait_ for #ident },
                None => quote! { #ident },
            };
            let block_attrs = &block.attrs;
            let unsafety = &block.unsafety;
            let types = &block.types;
            items.push(quote! {
                #(#block_attrs)*
                #unsafety impl #head {
                    #(#types)*
                    #(#methods)*
                }
            });
        }

        errors.finish()?;

        let field_names: Vec<_> = fields.iter().map(|(field, _)| field).collect();
        let marker_names = fields.iter().map(|(_, marker)| marker);

        // markers stay private to the declaring module, they name the
        // argument types of the traits
        Ok(quote! {
            #(#attrs)*
            #[allow(private_interfaces)]
            #vis struct #ident {
                #(pub #field_names: ::decoy::Binding<#marker_names>,)*
            }

            impl #ident {
                /// Creates a double whose bindings have not been called or
                /// configured.
                #vis fn new() -> Self {
                    #ident {
                        #(#field_names: ::decoy::Binding::new(#prototypes),)*
                    }
                }
            }

            impl ::std::default::Default for #ident {
                fn default() -> Self {
                    Self::new()
                }
            }

            #(#markers)*

            #(#items)*
        })
    }
}
