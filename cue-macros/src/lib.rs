use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Field, Fields, Type};

/// Derive macro implementing `cue::AnimatableObject` for a struct.
///
/// # Attributes on fields
/// - `#[object_id]` - The object's identity, of type `cue::ObjectId`
/// - `#[action_table]` - Its action table, either `Option<ActionTable>` or `ActionTable`
///
/// # Example
/// ```ignore
/// #[derive(AnimatableObject)]
/// pub struct Card {
///     #[object_id]
///     id: ObjectId,
///     #[action_table]
///     actions: Option<ActionTable>,
///     opacity: f32,
/// }
/// ```
#[proc_macro_derive(AnimatableObject, attributes(object_id, action_table))]
pub fn derive_animatable_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    struct_name,
                    "AnimatableObject can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(
                struct_name,
                "AnimatableObject can only be derived for structs",
            )
            .to_compile_error()
            .into();
        }
    };

    let id_field = match find_marked(fields.iter(), "object_id", struct_name) {
        Ok(field) => field,
        Err(e) => return e.to_compile_error().into(),
    };
    let table_field = match find_marked(fields.iter(), "action_table", struct_name) {
        Ok(field) => field,
        Err(e) => return e.to_compile_error().into(),
    };

    let id_name = &id_field.ident;
    let table_expr = table_accessor(table_field);

    let expanded = quote! {
        impl #impl_generics ::cue::AnimatableObject for #struct_name #ty_generics #where_clause {
            fn object_id(&self) -> ::cue::ObjectId {
                self.#id_name
            }

            fn action_table(&self) -> ::core::option::Option<&::cue::ActionTable> {
                #table_expr
            }
        }
    };

    TokenStream::from(expanded)
}

/// Find the single field carrying `#[marker]`
fn find_marked<'a>(
    fields: impl Iterator<Item = &'a Field>,
    marker: &str,
    struct_name: &syn::Ident,
) -> syn::Result<&'a Field> {
    let mut marked = fields.filter(|f| f.attrs.iter().any(|a| a.path().is_ident(marker)));
    let first = marked.next().ok_or_else(|| {
        syn::Error::new_spanned(
            struct_name,
            format!("AnimatableObject requires a field marked #[{}]", marker),
        )
    })?;
    if let Some(extra) = marked.next() {
        return Err(syn::Error::new_spanned(
            &extra.ident,
            format!("only one field may be marked #[{}]", marker),
        ));
    }
    Ok(first)
}

/// Expression borrowing the table field as `Option<&ActionTable>`
fn table_accessor(field: &Field) -> TokenStream2 {
    let name = &field.ident;
    if is_option(&field.ty) {
        quote! { self.#name.as_ref() }
    } else {
        quote! { ::core::option::Option::Some(&self.#name) }
    }
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"),
        _ => false,
    }
}
