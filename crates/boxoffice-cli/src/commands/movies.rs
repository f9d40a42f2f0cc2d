use boxoffice_api_models::{Movie, MovieInput};
use reqwest::Method;

use super::{
    confirmed, fetch_list, fetch_record, log_acknowledgement, record_id, report_alert,
    report_inline, require_target,
};
use crate::cli::{MovieFormArgs, MovieListArgs, MovieUpdateArgs};
use crate::client::{AppContext, CliResult, RequestOptions};
use crate::forms::{coerce_number, optional_text, required_text};
use crate::output::{render_movie_detail, render_movies};

const MOVIES_PATH: &str = "/api/v1/movies";

pub(crate) async fn handle_list(ctx: &AppContext, args: &MovieListArgs) -> CliResult<()> {
    let path = format!("{MOVIES_PATH}?skip={}&limit={}", args.skip, args.limit);
    let movies: Vec<Movie> = fetch_list(ctx, &path)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console.output(render_movies(&movies, ctx.output)?);
    ctx.console.status(format!("Loaded {} movies.", movies.len()));
    Ok(())
}

pub(crate) async fn handle_show(ctx: &AppContext, id: i64) -> CliResult<()> {
    let movie: Movie = fetch_record(ctx, &format!("{MOVIES_PATH}/{id}"))
        .await
        .map_err(|err| report_inline(ctx, &err))?;
    ctx.console.output(render_movie_detail(&movie, ctx.output)?);
    Ok(())
}

pub(crate) async fn handle_create(ctx: &AppContext, args: &MovieFormArgs) -> CliResult<()> {
    let options = RequestOptions::json(Method::POST, &movie_input(args))?;
    let created = ctx
        .request(MOVIES_PATH, options)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Created movie #{}", record_id(&created)));
    refresh(ctx).await
}

pub(crate) async fn handle_update(ctx: &AppContext, args: &MovieUpdateArgs) -> CliResult<()> {
    let id = require_target(ctx, args.id.as_deref(), "Provide movie ID to update.")?;
    let options = RequestOptions::json(Method::PUT, &movie_input(&args.form))?;
    let updated = ctx
        .request(&format!("{MOVIES_PATH}/{id}"), options)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Updated movie #{}", record_id(&updated)));
    refresh(ctx).await
}

pub(crate) async fn handle_deactivate(ctx: &AppContext, id: i64) -> CliResult<()> {
    let path = format!("{MOVIES_PATH}/{id}/deactivate");
    let body = ctx
        .request(&path, RequestOptions::method(Method::PATCH))
        .await
        .map_err(|err| report_alert(ctx, &err))?;
    log_acknowledgement(&path, body);
    refresh(ctx).await
}

pub(crate) async fn handle_delete(ctx: &AppContext, id: i64) -> CliResult<()> {
    if !confirmed(ctx, &format!("Delete movie #{id}?"))? {
        return Ok(());
    }

    let path = format!("{MOVIES_PATH}/{id}");
    let body = ctx
        .request(&path, RequestOptions::method(Method::DELETE))
        .await
        .map_err(|err| report_alert(ctx, &err))?;
    log_acknowledgement(&path, body);
    refresh(ctx).await
}

async fn refresh(ctx: &AppContext) -> CliResult<()> {
    handle_list(ctx, &MovieListArgs::default()).await
}

fn movie_input(form: &MovieFormArgs) -> MovieInput {
    MovieInput {
        title: required_text(form.title.as_deref()),
        description: optional_text(form.description.as_deref()),
        duration: coerce_number(form.duration.as_deref()),
        genre: required_text(form.genre.as_deref()),
    }
}
