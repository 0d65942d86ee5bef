use deluxe::ExtractAttributes;
use proc_macro2::TokenStream;
use quote::quote;

pub struct Output {
    pub primary_key: String,
    pub columns: Vec<TokenStream>,
    pub default_fields: Vec<TokenStream>,
}

#[derive(ExtractAttributes)]
#[deluxe(attributes(model))]
pub struct ModelAttributes {
    pub table: syn::Ident,
}

#[derive(ExtractAttributes, Default, Debug)]
#[deluxe(attributes(field))]
struct ModelField {
    primary_key: Option<bool>,
    auto: Option<bool>,
    unique: Option<bool>,
    size: Option<usize>,
    default: Option<TokenStream>,
    foreign_key: Option<TokenStream>,
}

pub fn process_fields(fields: &syn::punctuated::Punctuated<syn::Field, syn::Token![,]>) -> Output {
    let mut primary_key = String::from("id");
    let mut columns = Vec::new();
    let mut default_fields = Vec::new();

    for field in fields {
        let attributes = ModelField::extract_attributes(&mut field.clone()).unwrap_or_default();
        let field_name = field.ident.as_ref().expect("Field name should be present");
        let field_type = &field.ty;

        let inner_type = extract_inner_type(field_type);
        let nullable = is_nullable(field_type);
        let is_pk = attributes.primary_key.unwrap_or(false);

        if is_pk {
            primary_key = field_name.to_string();
        }

        columns.push(generate_column(&attributes, field_name, &inner_type, nullable, is_pk));
        default_fields.push(generate_default_field(
            &attributes.default,
            field_name,
            &inner_type,
            nullable,
        ));
    }

    Output {
        primary_key,
        columns,
        default_fields,
    }
}

fn generate_column(
    attributes: &ModelField,
    field_name: &syn::Ident,
    inner_type: &str,
    nullable: bool,
    is_pk: bool,
) -> TokenStream {
    let name = field_name.to_string();
    let field = to_camel_case(&name);
    let kind = column_kind(inner_type);
    let auto = attributes.auto.unwrap_or(false);
    let unique = attributes.unique.unwrap_or(false);
    let size = match attributes.size {
        Some(size) => quote! { Some(#size) },
        None => quote! { None },
    };
    let default = match construct_default_sql_value(&attributes.default, inner_type) {
        Some(value) => quote! { Some(#value) },
        None => quote! { None },
    };
    let references = construct_foreign_key(&attributes.foreign_key);

    quote! {
        ::rival_db::db::Column {
            name: #name,
            field: #field,
            kind: ::rival_db::db::ColumnKind::#kind,
            nullable: #nullable,
            primary_key: #is_pk,
            auto: #auto,
            unique: #unique,
            size: #size,
            default: #default,
            references: #references,
        }
    }
}

fn column_kind(inner_type: &str) -> TokenStream {
    match inner_type {
        "Integer" => quote! { Integer },
        "Float" => quote! { Real },
        "Boolean" => quote! { Boolean },
        "Text" | "String" => quote! { Text },
        "DateTime" => quote! { DateTime },
        "IdList" => quote! { Json },
        other => panic!(
            "Unsupported type: {}, only 'Integer' 'Float' 'Boolean' 'Text' 'String' 'DateTime' 'IdList' are available!",
            other
        ),
    }
}

fn construct_foreign_key(foreign_key: &Option<TokenStream>) -> TokenStream {
    match foreign_key {
        Some(fk) => match fk.to_string().split_once('.') {
            Some((table, field)) => {
                let (table, field) = (table.trim(), field.trim());
                quote! { Some((#table, #field)) }
            }
            _ => panic!("Invalid foreign key format, expected `table.column`"),
        },
        None => quote! { None },
    }
}

// Default for SQL
fn construct_default_sql_value(default: &Option<TokenStream>, inner_type: &str) -> Option<String> {
    let value = default.as_ref()?.to_string().replace('"', "");
    let sql = match (inner_type, value.as_str()) {
        ("DateTime", "now") => "current_timestamp".to_string(),
        ("Boolean", "true") => "1".to_string(),
        ("Boolean", "false") => "0".to_string(),
        (_, "now") => panic!("The keyword 'now' only works with DateTime type!"),
        ("Boolean", _) => panic!("Invalid boolean default value, use 'true' or 'false'!"),
        ("Integer", _) | ("Float", _) => value,
        _ => format!("'{}'", value.replace('\'', "''")),
    };
    Some(sql)
}

// Default for Rust `Default` impl
fn generate_default_field(
    default: &Option<TokenStream>,
    field_name: &syn::Ident,
    inner_type: &str,
    nullable: bool,
) -> TokenStream {
    let default_value = match default {
        Some(tokens) => {
            let value = tokens.to_string().replace('"', "");
            let value = match (inner_type, value.as_str()) {
                ("DateTime", "now") => {
                    quote! { ::rival_db::chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string() }
                }
                ("Boolean", "true") => quote! { true },
                ("Boolean", "false") => quote! { false },
                (_, "now") => panic!("The keyword 'now' only works with DateTime type!"),
                ("Boolean", _) => panic!("Invalid boolean default value, use 'true' or 'false'!"),
                ("Integer", _) | ("Float", _) => quote! { #tokens },
                _ => quote! { #value.into() },
            };
            if nullable {
                quote! { Some(#value) }
            } else {
                value
            }
        }
        None if nullable => quote! { None },
        None => match inner_type {
            "Float" => quote! { 0.0 },
            "Boolean" => quote! { false },
            "Integer" => quote! { 0 },
            "String" | "Text" | "DateTime" => quote! { String::default() },
            "IdList" => quote! { Vec::new() },
            _ => panic!("Unsupported type for default value"),
        },
    };

    quote! { #field_name: #default_value }
}

fn to_camel_case(name: &str) -> String {
    let mut camel = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            camel.extend(c.to_uppercase());
            upper = false;
        } else {
            camel.push(c);
        }
    }
    camel
}

fn is_nullable(ty: &syn::Type) -> bool {
    matches!(ty, syn::Type::Path(type_path) if type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == "Option"))
}

fn extract_inner_type(field_type: &syn::Type) -> String {
    if let syn::Type::Path(type_path) = field_type {
        if let Some(path_segment) = type_path.path.segments.last() {
            if path_segment.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &path_segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                        return extract_inner_type(inner_type);
                    }
                }
            }
            return path_segment.ident.to_string();
        }
    }
    panic!("Invalid type")
}
