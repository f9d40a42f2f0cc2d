use boxoffice_api_models::{Showtime, ShowtimeInput};
use reqwest::Method;

use super::{
    confirmed, fetch_list, fetch_record, log_acknowledgement, record_id, report_alert,
    report_inline, require_target,
};
use crate::cli::{ShowtimeFormArgs, ShowtimeUpdateArgs};
use crate::client::{AppContext, CliError, CliResult, RequestOptions};
use crate::forms::{coerce_number, parse_start_time};
use crate::output::{render_showtime_detail, render_showtimes};

const SHOWTIMES_PATH: &str = "/api/v1/showtimes";

pub(crate) async fn handle_list(ctx: &AppContext) -> CliResult<()> {
    let showtimes: Vec<Showtime> = fetch_list(ctx, SHOWTIMES_PATH)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console.output(render_showtimes(&showtimes, ctx.output)?);
    ctx.console
        .status(format!("Loaded {} showtimes.", showtimes.len()));
    Ok(())
}

pub(crate) async fn handle_show(ctx: &AppContext, id: i64) -> CliResult<()> {
    let showtime: Showtime = fetch_record(ctx, &format!("{SHOWTIMES_PATH}/{id}"))
        .await
        .map_err(|err| report_inline(ctx, &err))?;
    ctx.console
        .output(render_showtime_detail(&showtime, ctx.output)?);
    Ok(())
}

pub(crate) async fn handle_create(ctx: &AppContext, args: &ShowtimeFormArgs) -> CliResult<()> {
    let input = showtime_input(ctx, args)?;
    let options = RequestOptions::json(Method::POST, &input)?;
    let created = ctx
        .request(SHOWTIMES_PATH, options)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Created showtime #{}", record_id(&created)));
    handle_list(ctx).await
}

pub(crate) async fn handle_update(ctx: &AppContext, args: &ShowtimeUpdateArgs) -> CliResult<()> {
    let id = require_target(ctx, args.id.as_deref(), "Provide showtime ID to update.")?;
    let input = showtime_input(ctx, &args.form)?;
    let options = RequestOptions::json(Method::PUT, &input)?;
    let updated = ctx
        .request(&format!("{SHOWTIMES_PATH}/{id}"), options)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Updated showtime #{}", record_id(&updated)));
    handle_list(ctx).await
}

pub(crate) async fn handle_deactivate(ctx: &AppContext, id: i64) -> CliResult<()> {
    let path = format!("{SHOWTIMES_PATH}/{id}/deactivate");
    let body = ctx
        .request(&path, RequestOptions::method(Method::PATCH))
        .await
        .map_err(|err| report_alert(ctx, &err))?;
    log_acknowledgement(&path, body);
    handle_list(ctx).await
}

pub(crate) async fn handle_delete(ctx: &AppContext, id: i64) -> CliResult<()> {
    if !confirmed(ctx, &format!("Delete showtime #{id}?"))? {
        return Ok(());
    }

    let path = format!("{SHOWTIMES_PATH}/{id}");
    let body = ctx
        .request(&path, RequestOptions::method(Method::DELETE))
        .await
        .map_err(|err| report_alert(ctx, &err))?;
    log_acknowledgement(&path, body);
    handle_list(ctx).await
}

/// An unreadable start time is reported inline and nothing is sent.
fn showtime_input(ctx: &AppContext, form: &ShowtimeFormArgs) -> CliResult<ShowtimeInput> {
    let start_time =
        parse_start_time(form.start.as_deref().unwrap_or_default()).map_err(|message| {
            ctx.console.status(format!("Error: {message}"));
            CliError::reported_prompt()
        })?;

    Ok(ShowtimeInput {
        movie_id: coerce_number(form.movie_id.as_deref()),
        start_time,
        total_seats: coerce_number(form.total_seats.as_deref()),
    })
}
