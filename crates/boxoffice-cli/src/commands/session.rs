use crate::cli::{SetBaseUrlArgs, SetTokenArgs};
use crate::client::{AppContext, CliResult};

pub(crate) fn handle_show(ctx: &AppContext) -> CliResult<()> {
    let session = ctx.session.current();
    ctx.console.output(format!(
        "base url: {}\nstatus: {}\nsession file: {}",
        session.base_url,
        session.status_label(),
        ctx.session.path().display()
    ));
    Ok(())
}

pub(crate) fn handle_set_base_url(ctx: &mut AppContext, args: &SetBaseUrlArgs) -> CliResult<()> {
    let saved = ctx.session.set_base_url(&args.url)?.to_string();
    ctx.console.status(format!("Base URL saved: {saved}"));
    Ok(())
}

pub(crate) fn handle_set_token(ctx: &mut AppContext, args: &SetTokenArgs) -> CliResult<()> {
    ctx.session.set_token(&args.token)?;
    ctx.console.status("Token set.");
    Ok(())
}

pub(crate) fn handle_logout(ctx: &mut AppContext) -> CliResult<()> {
    ctx.session.clear_token()?;
    ctx.console.status("Logged out.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Channel;
    use crate::session::DEFAULT_BASE_URL;
    use crate::testing::Harness;
    use httpmock::MockServer;

    #[test]
    fn base_url_and_token_commands_update_the_session() {
        let server = MockServer::start();
        let mut harness = Harness::new(&server);

        handle_set_base_url(
            &mut harness.ctx,
            &SetBaseUrlArgs {
                url: " http://cinema.test/ ".to_string(),
            },
        )
        .expect("base url saved");
        handle_set_token(
            &mut harness.ctx,
            &SetTokenArgs {
                token: "tok123".to_string(),
            },
        )
        .expect("token saved");
        assert!(harness.ctx.session.current().is_authenticated());

        handle_logout(&mut harness.ctx).expect("logout");
        assert!(!harness.ctx.session.current().is_authenticated());

        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Base URL saved: http://cinema.test/", "Token set.", "Logged out."]
        );
    }

    #[test]
    fn blank_base_url_reports_the_default() {
        let server = MockServer::start();
        let mut harness = Harness::new(&server);
        handle_set_base_url(
            &mut harness.ctx,
            &SetBaseUrlArgs {
                url: "   ".to_string(),
            },
        )
        .expect("base url saved");
        assert_ne!(server.base_url(), DEFAULT_BASE_URL);
        assert_eq!(harness.ctx.session.current().base_url, DEFAULT_BASE_URL);
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec![format!("Base URL saved: {DEFAULT_BASE_URL}")]
        );
    }

    #[test]
    fn show_reports_status_without_the_token() {
        let server = MockServer::start();
        let harness = Harness::new(&server).authenticated("secret-token");
        handle_show(&harness.ctx).expect("show");

        let output = harness.console.lines(Channel::Output).join("\n");
        assert!(output.contains(&format!("base url: {}", server.base_url())));
        assert!(output.contains("status: Authenticated"));
        assert!(!output.contains("secret-token"));
    }
}
