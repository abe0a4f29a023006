//! `#[derive(Bind)]` for tagbind records.
//!
//! The derive describes a struct with named fields as a tagbind record.
//! Each field annotated with `#[bind("key,flags")]` becomes a described
//! field; fields without the attribute are left out and never touched.
//!
//! ```ignore
//! #[derive(Bind, Default)]
//! struct Rule {
//!     #[bind("port,computed")]
//!     port: u16,
//!     #[bind("target,computed,sub")]
//!     target: Target,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident, LitStr};

const ATTRIBUTE: &str = "bind";

/// Derives `tagbind::Bind` and `tagbind::Record`.
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

struct BoundField {
    ident: Ident,
    tag: LitStr,
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Bind can only be derived for structs with named fields",
                ))
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Bind can only be derived for structs",
            ))
        }
    };

    let mut bound = Vec::new();
    for field in fields {
        if let Some(tag) = parse_tag(&field.attrs)? {
            // Named fields always carry an identifier.
            if let Some(ident) = field.ident.clone() {
                bound.push(BoundField { ident, tag });
            }
        }
    }

    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let infos = bound.iter().map(|f| {
        let field_name = f.ident.to_string();
        let tag = &f.tag;
        quote! { ::tagbind::FieldInfo::new(#field_name, #tag) }
    });
    let indices: Vec<usize> = (0..bound.len()).collect();
    let idents: Vec<&Ident> = bound.iter().map(|f| &f.ident).collect();

    Ok(quote! {
        impl #impl_generics ::tagbind::Bind for #name #ty_generics #where_clause {
            fn node(&self) -> ::tagbind::NodeRef<'_> {
                ::tagbind::NodeRef::Record(self)
            }

            fn node_mut(&mut self) -> ::tagbind::NodeMut<'_> {
                ::tagbind::NodeMut::Record(self)
            }
        }

        impl #impl_generics ::tagbind::Record for #name #ty_generics #where_clause {
            fn record_name(&self) -> &'static str {
                #name_str
            }

            fn fields(&self) -> &'static [::tagbind::FieldInfo] {
                const FIELDS: &[::tagbind::FieldInfo] = &[#(#infos),*];
                FIELDS
            }

            fn field(&self, index: usize) -> ::core::option::Option<&dyn ::tagbind::Bind> {
                match index {
                    #(#indices => ::core::option::Option::Some(&self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn ::tagbind::Bind> {
                match index {
                    #(#indices => ::core::option::Option::Some(&mut self.#idents),)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

/// Reads the `#[bind("...")]` annotation of a field, if any.
fn parse_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut tag: Option<LitStr> = None;
    for attr in attrs {
        if !attr.path().is_ident(ATTRIBUTE) {
            continue;
        }
        if tag.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[bind] attribute on the same field",
            ));
        }
        let lit: LitStr = attr.parse_args().map_err(|e| {
            syn::Error::new(e.span(), "expected a string annotation, e.g. #[bind(\"key,computed\")]")
        })?;
        tag = Some(lit);
    }
    Ok(tag)
}
