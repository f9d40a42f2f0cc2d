use std::io::{self, IsTerminal};

use anyhow::anyhow;
use boxoffice_api_models::{RegisterRequest, RegisteredUser, TokenResponse};
use reqwest::Method;

use super::{decode, report_inline};
use crate::cli::{LoginArgs, RegisterArgs};
use crate::client::{AppContext, CliError, CliResult, RequestError, RequestOptions};

const REGISTER_PATH: &str = "/api/v1/auth/register";
const LOGIN_PATH: &str = "/api/v1/auth/login";

pub(crate) async fn handle_register(ctx: &AppContext, args: RegisterArgs) -> CliResult<()> {
    let request = RegisterRequest {
        username: args.username.trim().to_string(),
        email: args.email.trim().to_string(),
        full_name: args.full_name.trim().to_string(),
        password: resolve_password(args.password)?,
    };
    let options = RequestOptions::json(Method::POST, &request)?;

    let user: RegisteredUser = ctx
        .request(REGISTER_PATH, options)
        .await
        .and_then(decode)
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Registered user #{} ({})", user.id, user.username));
    Ok(())
}

pub(crate) async fn handle_login(ctx: &mut AppContext, args: LoginArgs) -> CliResult<()> {
    let fields = vec![
        ("username".to_string(), args.username.trim().to_string()),
        ("password".to_string(), resolve_password(args.password)?),
    ];

    let response: TokenResponse = ctx
        .request(LOGIN_PATH, RequestOptions::form(Method::POST, fields))
        .await
        .and_then(decode)
        .map_err(|err| report_inline(ctx, &err))?;

    let Some(token) = response
        .access_token
        .filter(|token| !token.trim().is_empty())
    else {
        let err = RequestError::Decode("login response did not include an access token".into());
        return Err(report_inline(ctx, &err));
    };

    ctx.session.set_token(&token)?;
    ctx.console.status("Token acquired.");
    Ok(())
}

fn resolve_password(provided: Option<String>) -> CliResult<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::validation(
            "password is required (pass --password or set BOXOFFICE_PASSWORD)",
        ));
    }
    rpassword::prompt_password("Password: ")
        .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))
}
