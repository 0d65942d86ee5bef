use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod process;

#[proc_macro_derive(Model, attributes(model, field))]
pub fn model_derive(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let model: process::ModelAttributes = match deluxe::extract_attributes(&mut input) {
        Ok(model) => model,
        Err(err) => return err.into_compile_error().into(),
    };

    let name = &input.ident;
    let table = &model.table;

    let fields = match input.data {
        Data::Struct(ref data) => match data.fields {
            Fields::Named(ref fields) => &fields.named,
            _ => panic!("Model derive macro only supports structs with named fields"),
        },
        _ => panic!("Model derive macro only supports structs"),
    };

    let process::Output {
        primary_key,
        columns,
        default_fields,
    } = process::process_fields(fields);

    let expanded = quote! {
        impl ::rival_db::db::Model for #name {
            const TABLE: ::rival_db::db::Table = ::rival_db::db::Table::#table;
            const PK: &'static str = #primary_key;
            const COLUMNS: &'static [::rival_db::db::Column] = &[#(#columns),*];
        }

        impl Default for #name {
            fn default() -> Self {
                Self {#(#default_fields),*}
            }
        }
    };

    expanded.into()
}
