use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse::ParseStream, parse_macro_input, punctuated::Punctuated, Attribute, FnArg, ImplItem,
    ImplItemFn, ItemImpl, Lit, LitStr, Token,
};

const HTTP_METHODS: [&str; 5] = ["get", "post", "put", "delete", "patch"];

struct RouteArgs {
    method: String,
    path: String,
    tags: Vec<LitStr>,
    description: Option<LitStr>,
    notes: Option<LitStr>,
    auth: Option<Lit>,
    produces: Option<Vec<LitStr>>,
    consumes: Option<Vec<LitStr>>,
    with: Option<syn::Path>,
}

impl RouteArgs {
    fn new(method: String) -> Self {
        Self {
            method,
            path: String::new(),
            tags: Vec::new(),
            description: None,
            notes: None,
            auth: None,
            produces: None,
            consumes: None,
            with: None,
        }
    }
}

struct RouteInfo {
    args: RouteArgs,
    fn_name: syn::Ident,
    takes_request: bool,
}

pub fn routes_attribute(attr: TokenStream, item: TokenStream) -> TokenStream {
    let controller = if attr.is_empty() {
        None
    } else {
        Some(parse_macro_input!(attr as syn::Type))
    };
    let input = parse_macro_input!(item as ItemImpl);
    match generate_routes_impl(controller, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

/// `#[routes(UserController)]` must name the type the impl block is for.
fn check_controller(controller: Option<&syn::Type>, self_ty: &syn::Type) -> syn::Result<()> {
    match controller {
        Some(named) if quote!(#named).to_string() != quote!(#self_ty).to_string() => {
            Err(syn::Error::new_spanned(
                named,
                format!(
                    "#[routes] names `{}` but the impl block is for `{}`",
                    quote!(#named),
                    quote!(#self_ty)
                ),
            ))
        }
        _ => Ok(()),
    }
}

fn generate_routes_impl(controller: Option<syn::Type>, input: ItemImpl) -> syn::Result<TokenStream2> {
    check_controller(controller.as_ref(), &input.self_ty)?;

    let mut routes: Vec<RouteInfo> = Vec::new();
    let mut clean_items: Vec<ImplItem> = Vec::new();

    for item in input.items.iter() {
        if let ImplItem::Fn(method) = item {
            if let Some(route_info) = extract_route_info(method)? {
                routes.push(route_info);
                let mut clean_method = method.clone();
                clean_method.attrs.retain(|attr| !is_route_attr(attr));
                clean_items.push(ImplItem::Fn(clean_method));
                continue;
            }
        }
        clean_items.push(item.clone());
    }

    let annotations = routes.iter().map(|route| {
        let options = route_options(&route.args);
        let fn_name = &route.fn_name;
        let name = fn_name.to_string();
        let call = if route.takes_request {
            quote! { this.#fn_name(request).await }
        } else {
            quote! { { let _ = request; this.#fn_name().await } }
        };
        quote! {
            registry.annotate(
                #options,
                ::routemeta::route::Handler::<Self>::new(
                    #name,
                    |this: ::std::sync::Arc<Self>, request: ::routemeta::axum::extract::Request| async move {
                        #call
                    },
                ),
            );
        }
    });

    let self_ty = &input.self_ty;
    let (impl_generics, _, where_clause) = input.generics.split_for_impl();
    let attrs = &input.attrs;

    Ok(quote! {
        #(#attrs)*
        impl #impl_generics #self_ty #where_clause {
            #(#clean_items)*
        }

        impl #impl_generics ::routemeta::DeclareRoutes for #self_ty #where_clause {
            #[allow(unused_variables)]
            fn declare_routes(registry: &::routemeta::RouteRegistry) {
                #(#annotations)*
            }
        }
    })
}

fn route_options(args: &RouteArgs) -> TokenStream2 {
    let method = &args.method;
    let path = &args.path;
    let mut options = quote! { ::routemeta::route::RouteOptions::new(#method, #path) };

    if !args.tags.is_empty() {
        let tags = &args.tags;
        options = quote! { #options.tags([#(#tags),*]) };
    }
    if let Some(description) = &args.description {
        options = quote! { #options.description(#description) };
    }
    if let Some(notes) = &args.notes {
        options = quote! { #options.notes(#notes) };
    }
    if let Some(auth) = &args.auth {
        options = quote! { #options.auth(#auth) };
    }
    if let Some(produces) = &args.produces {
        options = quote! { #options.produces(::std::vec::Vec::<&str>::from([#(#produces),*])) };
    }
    if let Some(consumes) = &args.consumes {
        options = quote! { #options.consumes(::std::vec::Vec::<&str>::from([#(#consumes),*])) };
    }
    if let Some(with) = &args.with {
        options = quote! { #with(#options) };
    }
    options
}

fn extract_route_info(method: &ImplItemFn) -> syn::Result<Option<RouteInfo>> {
    let mut found: Option<RouteArgs> = None;

    for attr in method.attrs.iter().filter(|attr| is_route_attr(attr)) {
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "a method can only be annotated with one route",
            ));
        }
        let name = attr
            .path()
            .get_ident()
            .map(|ident| ident.to_string())
            .unwrap_or_default();
        let fixed_method = if name == "route" {
            None
        } else {
            Some(name.to_uppercase())
        };

        let args = match &attr.meta {
            syn::Meta::Path(_) => match fixed_method {
                Some(method) => RouteArgs::new(method),
                None => {
                    return Err(syn::Error::new_spanned(
                        attr,
                        "#[route] needs a method and a path: #[route(\"OPTIONS\", \"/path\")]",
                    ))
                }
            },
            _ => attr.parse_args_with(|input: ParseStream| parse_route_args(input, fixed_method.clone()))?,
        };
        found = Some(args);
    }

    let Some(args) = found else {
        return Ok(None);
    };

    let mut has_receiver = false;
    let mut typed_args = 0usize;
    for input in method.sig.inputs.iter() {
        match input {
            FnArg::Receiver(_) => has_receiver = true,
            FnArg::Typed(_) => typed_args += 1,
        }
    }
    if !has_receiver || typed_args > 1 || method.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &method.sig,
            "route handlers must be `async fn` taking `&self` or `self: Arc<Self>` and at most the request",
        ));
    }

    Ok(Some(RouteInfo {
        args,
        fn_name: method.sig.ident.clone(),
        takes_request: typed_args == 1,
    }))
}

fn parse_route_args(input: ParseStream, method: Option<String>) -> syn::Result<RouteArgs> {
    let method = match method {
        Some(method) => method,
        None => {
            let lit: LitStr = input.parse()?;
            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
            lit.value().to_uppercase()
        }
    };
    let mut args = RouteArgs::new(method);

    if input.peek(LitStr) {
        let lit: LitStr = input.parse()?;
        args.path = lit.value();
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
    }

    while !input.is_empty() {
        let name: syn::Ident = input.parse()?;
        input.parse::<Token![=]>()?;
        match name.to_string().as_str() {
            "tags" => args.tags = parse_str_list(input)?,
            "description" => args.description = Some(input.parse()?),
            "notes" => args.notes = Some(input.parse()?),
            "auth" => {
                let lit: Lit = input.parse()?;
                if !matches!(lit, Lit::Str(_) | Lit::Bool(_)) {
                    return Err(syn::Error::new_spanned(
                        lit,
                        "auth must be a strategy name or a boolean",
                    ));
                }
                args.auth = Some(lit);
            }
            "produces" => args.produces = Some(parse_str_list(input)?),
            "consumes" => args.consumes = Some(parse_str_list(input)?),
            "with" => args.with = Some(input.parse()?),
            other => {
                return Err(syn::Error::new(
                    name.span(),
                    format!("unknown route option `{}`", other),
                ))
            }
        }
        if input.peek(Token![,]) {
            input.parse::<Token![,]>()?;
        }
    }
    Ok(args)
}

fn parse_str_list(input: ParseStream) -> syn::Result<Vec<LitStr>> {
    let content;
    syn::bracketed!(content in input);
    let items = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(items.into_iter().collect())
}

fn is_route_attr(attr: &Attribute) -> bool {
    attr.path().get_ident().map_or(false, |ident| {
        let name = ident.to_string();
        name == "route" || HTTP_METHODS.contains(&name.as_str())
    })
}

/// Inert form of a route attribute outside `#[routes]`
pub fn http_method_attribute(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ImplItemFn);
    TokenStream::from(quote! {
        #input
    })
}
