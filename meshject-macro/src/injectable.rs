use darling::ast::NestedMeta;
use darling::{FromDeriveInput, FromMeta};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident};

#[derive(FromDeriveInput)]
#[darling(attributes(injectable), supports(struct_named, struct_unit))]
struct InjectableOpts {
    ident: Ident,
    generics: syn::Generics,
    #[darling(default)]
    constructor: Option<Ident>,
    #[darling(multiple, rename = "method")]
    methods: Vec<MethodOpts>,
    #[darling(default)]
    handler: Option<Ident>,
}

#[derive(FromMeta)]
struct MethodOpts {
    name: Ident,
    #[darling(default)]
    ids: IdList,
}

/// `ids(0, 2, 1)`
#[derive(Default)]
struct IdList(Vec<i32>);

impl FromMeta for IdList {
    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        items
            .iter()
            .map(|item| match item {
                NestedMeta::Lit(syn::Lit::Int(lit)) => {
                    lit.base10_parse::<i32>().map_err(darling::Error::from)
                }
                other => Err(darling::Error::unexpected_type("non-integer").with_span(other)),
            })
            .collect::<darling::Result<Vec<_>>>()
            .map(IdList)
    }
}

struct InjectField {
    name: Ident,
    ty: syn::Type,
    id: i32,
}

pub fn derive_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_injectable_impl(&input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(e) => TokenStream::from(e.write_errors()),
    }
}

fn generate_injectable_impl(input: &DeriveInput) -> darling::Result<TokenStream2> {
    let opts = InjectableOpts::from_derive_input(input)?;
    let fields = collect_inject_fields(input)?;

    let struct_name = &opts.ident;
    let (impl_generics, ty_generics, where_clause) = opts.generics.split_for_impl();

    let construct = match &opts.constructor {
        Some(ctor) => quote! {
            container.construct_with(&[], Self::#ctor)
        },
        None => quote! {
            let _ = container;
            ::core::option::Option::Some(<Self as ::core::default::Default>::default())
        },
    };

    let field_points = fields.iter().map(|field| {
        let InjectField { name, ty, id } = field;
        quote! {
            .field(
                ::core::stringify!(#name),
                #id,
                |this: &mut Self, value: #ty| this.#name = value,
            )
        }
    });

    let method_points = opts.methods.iter().map(|method| {
        let name = &method.name;
        let ids = &method.ids.0;
        quote! {
            .method(::core::stringify!(#name), &[#(#ids),*], Self::#name)
        }
    });

    let handler_point = opts.handler.iter().map(|handler| {
        quote! {
            .handler(Self::#handler)
        }
    });

    Ok(quote! {
        impl #impl_generics ::meshject::Injectable for #struct_name #ty_generics #where_clause {
            fn construct(
                container: &::meshject::Container
            ) -> ::core::option::Option<Self> {
                #construct
            }

            fn injection_points() -> ::meshject::InjectionPoints<Self> {
                ::meshject::InjectionPoints::new()
                    #(#field_points)*
                    #(#method_points)*
                    #(#handler_point)*
            }
        }
    })
}

/// Fields carrying `#[inject]` or `#[inject(id = N)]`, in declaration order
fn collect_inject_fields(input: &DeriveInput) -> darling::Result<Vec<InjectField>> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => fields.named.iter().collect::<Vec<_>>(),
            _ => Vec::new(),
        },
        _ => return Err(darling::Error::unsupported_shape("enum or union")),
    };

    let mut errors = darling::Error::accumulator();
    let mut injected = Vec::new();

    for field in fields {
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("inject")) {
            let mut id = 0;
            if let syn::Meta::List(_) = &attr.meta {
                let parsed = attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("id") {
                        let lit: syn::LitInt = meta.value()?.parse()?;
                        id = lit.base10_parse()?;
                        Ok(())
                    } else {
                        Err(meta.error("unsupported inject property, expected `id`"))
                    }
                });
                if errors.handle(parsed.map_err(darling::Error::from)).is_none() {
                    continue;
                }
            }

            if let Some(name) = &field.ident {
                injected.push(InjectField {
                    name: name.clone(),
                    ty: field.ty.clone(),
                    id,
                });
            }
        }
    }

    errors.finish_with(injected)
}
