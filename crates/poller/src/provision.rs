use fleetline_messaging::consumer::DeliverPolicy;
use fleetline_messaging::stream::Stream;
use tracing::info;

/// Deterministic stream name for a user identity.
#[must_use]
pub fn stream_name(user: &str) -> String {
    format!("LOG_{user}")
}

/// Deterministic durable consumer name for a user identity.
#[must_use]
pub fn durable_name(user: &str) -> String {
    format!("cursor-{user}")
}

/// Ensures the durable stream and cursor for `user` exist, and returns the
/// cursor handle.
///
/// Names are derived from the user identity so repeated runs reattach to the
/// same durable state instead of accumulating orphaned streams and cursors.
/// Re-invoking with identical arguments leaves an existing cursor's position
/// untouched.
///
/// # Errors
///
/// Returns the stream implementation's error when the broker rejects the
/// stream or consumer configuration.
pub async fn provision<S>(
    user: &str,
    subject_filter: &str,
    options: S::Options,
) -> Result<S::Consumer, S::Error>
where
    S: Stream,
{
    let stream = S::ensure(
        stream_name(user),
        vec![subject_filter.to_string()],
        options,
    )
    .await?;

    let consumer = stream
        .ensure_consumer(durable_name(user), DeliverPolicy::All)
        .await?;

    info!(
        stream = stream.name(),
        durable = durable_name(user),
        "provisioned durable consumer"
    );

    Ok(consumer)
}
