use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use quote::quote_spanned;

/// Turns a function into a consumer contract test.
///
/// ```ignore
/// #[contract_test("furniture-ui-consumer", "furniture-service-producer", configure)]
/// fn furniture_types(session: &ConsumerSession) { ... }
/// ```
///
/// The optional third argument is a `fn(&mut ContractConfiguration)`. The session is finished
/// (and the contract written) only when the body returns normally.
#[proc_macro_attribute]
pub fn contract_test(attrs: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    let args = syn::parse_macro_input!(attrs as syn::AttributeArgs);

    let attributes = &input.attrs;
    let name = &input.sig.ident;
    let block = &input.block;

    if args.len() < 2 || args.len() > 3 {
        return quote! {
            compile_error!("A consumer name, a provider name and optionally a configuration function should be passed to the macro");
        }
        .into();
    }

    let consumer = match participant_name(&args[0], "consumer") {
        Ok(consumer) => consumer,
        Err(stream) => return stream.into(),
    };
    let provider = match participant_name(&args[1], "provider") {
        Ok(provider) => provider,
        Err(stream) => return stream.into(),
    };

    let configure = match args.get(2) {
        Some(syn::NestedMeta::Meta(syn::Meta::Path(function_path))) => {
            quote! { #function_path(&mut __contract_configuration); }
        }
        Some(_) => {
            return quote! {
                compile_error!("The third argument should be a configuration function!");
            }
            .into();
        }
        None => quote! {},
    };

    let session_pattern = match input.sig.inputs.first() {
        Some(syn::FnArg::Typed(pat_type)) if input.sig.inputs.len() == 1 => {
            let pattern = &pat_type.pat;
            quote! { #pattern }
        }
        None => quote! { _ },
        Some(_) => {
            return quote! {
                compile_error!("A contract test takes at most one argument: &contract::ConsumerSession");
            }
            .into();
        }
    };

    let output = quote! {
        #[test]
        #(#attributes)*
        fn #name() {
            let mut __contract_configuration = ::contract::ContractConfiguration::new(#consumer, #provider);
            #configure
            let __contract_session = match ::contract::ConsumerSession::start(__contract_configuration) {
                Ok(session) => session,
                Err(e) => panic!("Contract Error: {}", e),
            };

            (|#session_pattern: &::contract::ConsumerSession| #block)(&__contract_session);

            if let Err(e) = __contract_session.finish() {
                panic!("Contract Error: {}", e);
            }
        }
    };

    TokenStream::from(output)
}

fn participant_name(arg: &syn::NestedMeta, role: &str) -> Result<String, proc_macro2::TokenStream> {
    match arg {
        syn::NestedMeta::Lit(syn::Lit::Str(name)) => {
            validate_participant_name(&name.value(), name.span())?;
            Ok(name.value())
        }
        _ => {
            let message = format!("The {} name should be a string literal!", role);
            Err(quote! {
                compile_error!(#message);
            })
        }
    }
}

fn validate_participant_name(name: &str, span: Span) -> Result<(), proc_macro2::TokenStream> {
    if name.trim().is_empty() {
        return Err(quote_spanned! {span=>
            compile_error!("Participant names can't be empty!");
        });
    }

    Ok(())
}
