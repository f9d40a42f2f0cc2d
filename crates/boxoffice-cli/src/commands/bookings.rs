use boxoffice_api_models::{Booking, BookingInput};
use reqwest::Method;

use super::{
    confirmed, fetch_list, log_acknowledgement, record_id, report_alert, report_inline,
    require_target,
};
use crate::cli::{BookingCancelArgs, BookingFormArgs};
use crate::client::{AppContext, CliResult, RequestOptions};
use crate::forms::coerce_number;
use crate::output::render_bookings;

const BOOKINGS_PATH: &str = "/api/v1/bookings";

pub(crate) async fn handle_list(ctx: &AppContext) -> CliResult<()> {
    let bookings: Vec<Booking> = fetch_list(ctx, BOOKINGS_PATH)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console.output(render_bookings(&bookings, ctx.output)?);
    ctx.console
        .status(format!("Loaded {} bookings.", bookings.len()));
    Ok(())
}

pub(crate) async fn handle_create(ctx: &AppContext, args: &BookingFormArgs) -> CliResult<()> {
    let input = BookingInput {
        showtime_id: coerce_number(args.showtime_id.as_deref()),
        seats: coerce_number(args.seats.as_deref()),
    };
    let options = RequestOptions::json(Method::POST, &input)?;
    let created = ctx
        .request(BOOKINGS_PATH, options)
        .await
        .map_err(|err| report_inline(ctx, &err))?;

    ctx.console
        .status(format!("Created booking #{}", record_id(&created)));
    handle_list(ctx).await
}

/// Moves a booking to `cancelled`; the record stays listed.
pub(crate) async fn handle_cancel(ctx: &AppContext, args: &BookingCancelArgs) -> CliResult<()> {
    let id = require_target(ctx, args.id.as_deref(), "Provide booking ID to cancel.")?;
    if !confirmed(ctx, &format!("Cancel booking #{id}?"))? {
        return Ok(());
    }

    let path = format!("{BOOKINGS_PATH}/{id}/cancel");
    let body = ctx
        .request(&path, RequestOptions::method(Method::PATCH))
        .await
        .map_err(|err| report_inline(ctx, &err))?;
    log_acknowledgement(&path, body);

    ctx.console.status(format!("Cancelled booking #{id}"));
    handle_list(ctx).await
}

pub(crate) async fn handle_delete(ctx: &AppContext, id: i64) -> CliResult<()> {
    if !confirmed(ctx, &format!("Delete booking #{id}?"))? {
        return Ok(());
    }

    let path = format!("{BOOKINGS_PATH}/{id}");
    let body = ctx
        .request(&path, RequestOptions::method(Method::DELETE))
        .await
        .map_err(|err| report_alert(ctx, &err))?;
    log_acknowledgement(&path, body);
    handle_list(ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::console::Channel;
    use crate::testing::Harness;
    use httpmock::Method::PATCH;
    use httpmock::prelude::*;
    use serde_json::json;

    fn booking_json(id: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "user_id": 4,
            "showtime_id": 3,
            "showtime": {"movie_id": 1, "start_time": "2025-05-01T18:00:00"},
            "seats": 2,
            "status": status,
            "booking_time": "2025-04-30T12:00:00"
        })
    }

    #[tokio::test]
    async fn list_renders_movie_from_nested_showtime() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET)
                .path(BOOKINGS_PATH)
                .header("authorization", "Bearer tok123");
            then.status(200).json_body(json!([
                booking_json(1, "confirmed"),
                {
                    "id": 2,
                    "user_id": 4,
                    "showtime_id": 3,
                    "seats": 1,
                    "status": "pending",
                    "booking_time": "2025-04-30T13:00:00"
                }
            ]));
        });

        let harness = Harness::new(&server).authenticated("tok123");
        handle_list(&harness.ctx).await.expect("list succeeds");

        let output = harness.console.lines(Channel::Output).join("\n");
        let rows: Vec<&str> = output.lines().collect();
        assert_eq!(rows.len(), 3);
        assert!(rows[1].ends_with('1'));
        assert!(rows[2].ends_with("N/A"));
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Loaded 2 bookings."]
        );
    }

    #[tokio::test]
    async fn create_coerces_fields_and_refreshes() {
        let server = MockServer::start_async().await;
        let create = server.mock(|when, then| {
            when.method(POST)
                .path(BOOKINGS_PATH)
                .json_body(json!({"showtime_id": 3, "seats": 2}));
            then.status(201).json_body(booking_json(11, "confirmed"));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path(BOOKINGS_PATH);
            then.status(200).json_body(json!([booking_json(11, "confirmed")]));
        });

        let harness = Harness::new(&server);
        handle_create(
            &harness.ctx,
            &BookingFormArgs {
                showtime_id: Some("3".to_string()),
                seats: Some(" 2 ".to_string()),
            },
        )
        .await
        .expect("create succeeds");

        create.assert();
        list.assert();
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Created booking #11", "Loaded 1 bookings."]
        );
    }

    #[tokio::test]
    async fn cancel_patches_status_after_confirmation() {
        let server = MockServer::start_async().await;
        let cancel = server.mock(|when, then| {
            when.method(PATCH).path("/api/v1/bookings/11/cancel");
            then.status(200).json_body(booking_json(11, "cancelled"));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path(BOOKINGS_PATH);
            then.status(200).json_body(json!([booking_json(11, "cancelled")]));
        });

        let harness = Harness::new(&server);
        handle_cancel(
            &harness.ctx,
            &BookingCancelArgs {
                id: Some("11".to_string()),
            },
        )
        .await
        .expect("cancel succeeds");

        cancel.assert();
        list.assert();
        assert_eq!(harness.confirm.asked(), vec!["Cancel booking #11?"]);
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Cancelled booking #11", "Loaded 1 bookings."]
        );
    }

    #[tokio::test]
    async fn cancel_without_id_prompts() {
        let server = MockServer::start_async().await;
        let harness = Harness::new(&server);

        let err = handle_cancel(&harness.ctx, &BookingCancelArgs { id: None })
            .await
            .expect_err("missing id");

        assert_eq!(err.exit_code(), 2);
        assert!(harness.confirm.asked().is_empty());
        assert!(harness.ctx.api.last_response().is_none());
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Provide booking ID to cancel."]
        );
    }

    #[tokio::test]
    async fn cancel_failure_is_reported_not_swallowed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(PATCH).path("/api/v1/bookings/11/cancel");
            then.status(400)
                .json_body(json!({"detail": "Booking is already cancelled"}));
        });

        let harness = Harness::new(&server);
        handle_cancel(
            &harness.ctx,
            &BookingCancelArgs {
                id: Some("11".to_string()),
            },
        )
        .await
        .expect_err("already cancelled");

        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Error: Booking is already cancelled"]
        );
    }

    #[tokio::test]
    async fn declined_cancel_sends_nothing() {
        let server = MockServer::start_async().await;
        let harness = Harness::new(&server).answering(false);

        handle_cancel(
            &harness.ctx,
            &BookingCancelArgs {
                id: Some("11".to_string()),
            },
        )
        .await
        .expect("declining is not an error");

        assert!(harness.ctx.api.last_response().is_none());
        assert!(harness.console.is_empty());
    }

    #[tokio::test]
    async fn cancel_rejects_path_like_ids() {
        let server = MockServer::start_async().await;
        let harness = Harness::new(&server);

        let err = handle_cancel(
            &harness.ctx,
            &BookingCancelArgs {
                id: Some("11/../12".to_string()),
            },
        )
        .await
        .expect_err("non-numeric id is rejected");

        assert_eq!(err.exit_code(), 2);
        assert!(harness.confirm.asked().is_empty());
        assert!(harness.ctx.api.last_response().is_none());
    }

    #[tokio::test]
    async fn confirmed_delete_refreshes_once() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/bookings/11");
            then.status(200)
                .json_body(json!({"message": "Booking deleted successfully"}));
        });
        let list = server.mock(|when, then| {
            when.method(GET).path(BOOKINGS_PATH);
            then.status(200).json_body(json!([]));
        });

        let harness = Harness::new(&server);
        handle_delete(&harness.ctx, 11)
            .await
            .expect("delete succeeds");

        delete.assert();
        list.assert();
        assert_eq!(harness.confirm.asked(), vec!["Delete booking #11?"]);
        assert_eq!(
            harness.console.lines(Channel::Status),
            vec!["Loaded 0 bookings."]
        );
    }

    #[tokio::test]
    async fn declined_delete_sends_nothing() {
        let server = MockServer::start_async().await;
        let harness = Harness::new(&server).answering(false);

        handle_delete(&harness.ctx, 11)
            .await
            .expect("declining is not an error");

        assert_eq!(harness.confirm.asked(), vec!["Delete booking #11?"]);
        assert!(harness.ctx.api.last_response().is_none());
        assert!(harness.console.is_empty());
    }

    #[tokio::test]
    async fn delete_failure_raises_an_alert() {
        let server = MockServer::start_async().await;
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/bookings/11");
            then.status(404).json_body(json!({"detail": "Booking not found"}));
        });

        let harness = Harness::new(&server).output(OutputFormat::Json);
        handle_delete(&harness.ctx, 11)
            .await
            .expect_err("missing booking");

        delete.assert();
        assert_eq!(harness.confirm.asked(), vec!["Delete booking #11?"]);
        assert_eq!(
            harness.console.lines(Channel::Alert),
            vec!["Failed: Booking not found"]
        );
    }
}
