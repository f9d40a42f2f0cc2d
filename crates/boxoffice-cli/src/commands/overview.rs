use super::{bookings, movies, showtimes};
use crate::cli::MovieListArgs;
use crate::client::{AppContext, CliResult};

/// Load every list in turn; a failing list does not stop the others.
pub(crate) async fn handle_overview(ctx: &AppContext) -> CliResult<()> {
    let session = ctx.session.current();
    if !session.is_authenticated() {
        ctx.console.status(session.status_label());
        return Ok(());
    }

    let movies = movies::handle_list(ctx, &MovieListArgs::default()).await;
    let showtimes = showtimes::handle_list(ctx).await;
    let bookings = bookings::handle_list(ctx).await;
    movies.and(showtimes).and(bookings)
}
