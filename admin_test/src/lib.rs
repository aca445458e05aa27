use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, spanned::Spanned, FnArg, Ident, ItemFn, Pat, Signature, Type};

/// Transform an asynchronous test into a synchronous one and inject
/// dependencies.
///
/// Injectable dependencies are [`rocket::local::asynchronous::Client`] and
/// `crate::card::FakeCardReader`, which controls the card the client's
/// rocket will read. Pass `session` to start the example tally session
/// before the test body runs.
#[proc_macro_attribute]
pub fn admin_test(args: TokenStream, input: TokenStream) -> TokenStream {
    let mut item_fn = parse_macro_input!(input as ItemFn);

    // Extract the injected arguments and reject invalid function signatures.
    let test_args = match check_sig(item_fn.sig.clone()) {
        Ok(args) => args,
        Err(err) => {
            return err.into_compile_error().into();
        }
    };

    // Rename the future so the test can have its original name.
    let name = item_fn.sig.ident.clone();
    let new_name = format_ident!("{}_fut", name);
    item_fn.sig.ident = new_name.clone();

    // Open a tally session if needed.
    let maybe_session = match parse_macro_input!(args as Option<Ident>) {
        Some(arg) if arg == "session" => quote! {{
            let response = rocket_client
                .post(uri!(crate::api::session::start_tally))
                .header(rocket::http::ContentType::JSON)
                .body(rocket::serde::json::json!(crate::model::api::StartTally::example()).to_string())
                .dispatch()
                .await;
            assert_eq!(response.status(), rocket::http::Status::Ok, "failed to open tally session");
        }},
        Some(arg) => {
            return syn::Error::new(arg.span(), "Expected `session` or nothing")
                .into_compile_error()
                .into();
        }
        None => quote! {},
    };

    quote! {
        #[test]
        fn #name() {
            /// Test setup.
            async fn setup(card_reader: crate::card::FakeCardReader) -> rocket::local::asynchronous::Client {
                let instance = crate::rocket_with_card_reader(Box::new(card_reader));
                let rocket_client = rocket::local::asynchronous::Client::tracked(instance)
                    .await
                    .unwrap();

                #maybe_session

                rocket_client
            }

            /// The test itself.
            #item_fn

            let runtime = rocket::tokio::runtime::Builder::new_multi_thread()
                .thread_name("rocket-worker-test-thread")
                .worker_threads(1)
                .enable_all()
                .build()
                .unwrap();

            let card_reader = crate::card::FakeCardReader::default();
            let rocket_client = runtime.block_on(setup(card_reader.clone()));
            runtime.block_on(#new_name(#(#test_args),*));
        }
    }
    .into()
}

/// Ensure the wrapped test is async, extract parameters to inject, and reject unknown parameters.
fn check_sig(sig: Signature) -> Result<Vec<TokenStream2>, syn::Error> {
    if sig.asyncness.is_none() {
        return Err(syn::Error::new(sig.span(), "Test must be marked `async`"));
    }

    let mut has_client = false;
    let mut has_card = false;
    let mut args = vec![];

    for input in &sig.inputs {
        if let FnArg::Typed(pat_type) = input {
            if let (Pat::Ident(_), Type::Path(type_path)) = (&*pat_type.pat, &*pat_type.ty) {
                if let Some(type_ident) = type_path.path.segments.last().map(|s| &s.ident) {
                    if type_ident == "Client" {
                        if has_client {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `rocket::local::asynchronous::Client`",
                            ));
                        }
                        has_client = true;
                        args.push(quote! { rocket_client });
                        continue;
                    } else if type_ident == "FakeCardReader" {
                        if has_card {
                            return Err(syn::Error::new(
                                input.span(),
                                "Test cannot accept more than one `FakeCardReader`",
                            ));
                        }
                        has_card = true;
                        args.push(quote! { card_reader });
                        continue;
                    }
                }
            }
        }

        return Err(syn::Error::new(
            input.span(),
            "Expected one of `client_ident: Client` or `card_ident: FakeCardReader`",
        ));
    }

    Ok(args)
}
