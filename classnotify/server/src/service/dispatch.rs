//! Executes composed notices against the mail transport.

use std::{sync::Arc, time::Duration};

use notification::{Mailer, OutboundMessage};
use quill_metrics::DefaultMetrics;
use snafu::ResultExt;
use tokio::time::{sleep_until, timeout, Instant};

use super::error::{self, Error, Result};
use crate::entity::{DeliveryFailure, DispatchReport, Recipient};

/// Enforces the minimum spacing between consecutive submissions of a batch.
///
/// The gate arms on the first call, so no delay is imposed before the first
/// send. The shared relay quota is per outbound message, which is why the
/// spacing is sequential rather than a concurrency cap.
#[derive(Debug)]
struct IntervalGate {
    interval: Duration,
    armed_at: Option<Instant>,
}

impl IntervalGate {
    const fn new(interval: Duration) -> Self { Self { interval, armed_at: None } }

    /// Waits until the interval has elapsed since the previous call, then
    /// re-arms.
    async fn pace(&mut self) {
        if let Some(armed_at) = self.armed_at {
            sleep_until(armed_at + self.interval).await;
        }
        self.armed_at = Some(Instant::now());
    }
}

/// Dispatch engine: submits notices one at a time, paced against the relay
/// quota, and keeps one failed recipient from starving the rest of a batch.
#[derive(Clone)]
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
    pacing_interval: Duration,
    send_timeout: Duration,
    metrics: DefaultMetrics,
}

impl Dispatcher {
    #[must_use]
    pub fn new(
        mailer: Arc<dyn Mailer>,
        pacing_interval: Duration,
        send_timeout: Duration,
        metrics: DefaultMetrics,
    ) -> Self {
        Self { mailer, pacing_interval, send_timeout, metrics }
    }

    /// Delivers a single notice, surfacing the failure directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport rejects the submission or does not
    /// answer within the configured timeout.
    pub async fn dispatch_one(&self, outbound: &OutboundMessage) -> Result<()> {
        match self.submit(outbound).await {
            Ok(()) => {
                self.metrics.record_sent();
                Ok(())
            }
            Err(err) => {
                self.metrics.record_failed();
                Err(err)
            }
        }
    }

    /// Delivers one notice per recipient, sequentially.
    ///
    /// A recipient whose notice can not be composed or delivered is recorded
    /// in the report and the loop continues with the remainder of the batch.
    pub async fn dispatch_all<ComposeFn>(
        &self,
        recipients: &[Recipient],
        compose: ComposeFn,
    ) -> DispatchReport
    where
        ComposeFn: Fn(&Recipient) -> Result<OutboundMessage>,
    {
        let mut gate = IntervalGate::new(self.pacing_interval);
        let mut report =
            DispatchReport { attempted: 0, succeeded: 0, failures: Vec::new() };

        for recipient in recipients {
            report.attempted += 1;

            let outbound = match compose(recipient) {
                Ok(outbound) => outbound,
                Err(err) => {
                    tracing::warn!(
                        recipient = %recipient.email,
                        error = %err,
                        "Notice could not be composed, continuing with remaining recipients"
                    );
                    self.metrics.record_failed();
                    report.failures.push(DeliveryFailure {
                        recipient: recipient.email.clone(),
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            gate.pace().await;

            match self.submit(&outbound).await {
                Ok(()) => {
                    self.metrics.record_sent();
                    report.succeeded += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        recipient = %recipient.email,
                        error = %err,
                        "Delivery failed, continuing with remaining recipients"
                    );
                    self.metrics.record_failed();
                    report.failures.push(DeliveryFailure {
                        recipient: recipient.email.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        report
    }

    async fn submit(&self, outbound: &OutboundMessage) -> Result<()> {
        match timeout(self.send_timeout, self.mailer.send(outbound)).await {
            Ok(result) => {
                result.context(error::DeliverNoticeSnafu { recipient: outbound.to.clone() })
            }
            Err(_) => Err(Error::SendTimeout {
                recipient: outbound.to.clone(),
                timeout_secs: self.send_timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;

    struct RecordingMailer {
        fail_for: Vec<String>,
        sent_at: Mutex<Vec<(String, Instant)>>,
        stall: bool,
    }

    impl RecordingMailer {
        fn new() -> Self { Self { fail_for: Vec::new(), sent_at: Mutex::new(Vec::new()), stall: false } }

        fn failing_for(addresses: &[&str]) -> Self {
            Self {
                fail_for: addresses.iter().map(ToString::to_string).collect(),
                sent_at: Mutex::new(Vec::new()),
                stall: false,
            }
        }

        fn send_starts(&self) -> Vec<(String, Instant)> {
            self.sent_at.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            outbound: &OutboundMessage,
        ) -> std::result::Result<(), notification::Error> {
            self.sent_at.lock().unwrap().push((outbound.to.clone(), Instant::now()));

            if self.stall {
                std::future::pending::<()>().await;
            }

            if self.fail_for.contains(&outbound.to) {
                return Err(notification::Error::InvalidAddress {
                    address: outbound.to.clone(),
                });
            }

            Ok(())
        }
    }

    fn recipients(addresses: &[&str]) -> Vec<Recipient> {
        addresses
            .iter()
            .map(|address| Recipient {
                email: (*address).to_string(),
                full_name: "Jordan Lee".to_string(),
                role: "student".to_string(),
            })
            .collect()
    }

    fn compose_plain(recipient: &Recipient) -> Result<OutboundMessage> {
        Ok(OutboundMessage {
            to: recipient.email.clone(),
            subject: "subject".to_string(),
            body: "body".to_string(),
            attachment: None,
        })
    }

    fn dispatcher(mailer: Arc<RecordingMailer>, pacing: Duration) -> Dispatcher {
        Dispatcher::new(mailer, pacing, Duration::from_secs(30), DefaultMetrics::new().unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_failed_recipient_does_not_abort_the_batch() {
        let mailer = Arc::new(RecordingMailer::failing_for(&["b@ex.com"]));
        let dispatcher = dispatcher(mailer.clone(), Duration::ZERO);

        let report = dispatcher
            .dispatch_all(&recipients(&["a@ex.com", "b@ex.com", "c@ex.com"]), compose_plain)
            .await;

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].recipient, "b@ex.com");

        // All three recipients reached the transport.
        let starts = mailer.send_starts();
        assert_eq!(starts.len(), 3);
        assert_eq!(starts[2].0, "c@ex.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_compose_is_isolated() {
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = dispatcher(mailer.clone(), Duration::ZERO);

        let report = dispatcher
            .dispatch_all(&recipients(&["a@ex.com", "b@ex.com"]), |recipient| {
                if recipient.email == "a@ex.com" {
                    return Err(Error::MissingField { field: "quiz_code" });
                }
                compose_plain(recipient)
            })
            .await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failures[0].recipient, "a@ex.com");
        assert_eq!(mailer.send_starts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sends_are_paced_but_not_the_first() {
        let interval = Duration::from_secs(5);
        let mailer = Arc::new(RecordingMailer::new());
        let dispatcher = dispatcher(mailer.clone(), interval);

        let started_at = Instant::now();
        let report = dispatcher
            .dispatch_all(&recipients(&["a@ex.com", "b@ex.com", "c@ex.com"]), compose_plain)
            .await;

        assert_eq!(report.succeeded, 3);

        let starts = mailer.send_starts();
        // No delay before the first send.
        assert!(starts[0].1.duration_since(started_at) < interval);
        // At least the configured interval between consecutive send starts.
        assert!(starts[1].1 - starts[0].1 >= interval);
        assert!(starts[2].1 - starts[1].1 >= interval);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_transport_times_out() {
        let mut mailer = RecordingMailer::new();
        mailer.stall = true;
        let dispatcher = Dispatcher::new(
            Arc::new(mailer),
            Duration::ZERO,
            Duration::from_secs(30),
            DefaultMetrics::new().unwrap(),
        );

        let outbound = OutboundMessage {
            to: "a@ex.com".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
            attachment: None,
        };

        let err = dispatcher.dispatch_one(&outbound).await.unwrap_err();
        assert!(matches!(err, Error::SendTimeout { timeout_secs: 30, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_one_surfaces_transport_failure() {
        let mailer = Arc::new(RecordingMailer::failing_for(&["a@ex.com"]));
        let dispatcher = dispatcher(mailer, Duration::ZERO);

        let outbound = OutboundMessage {
            to: "a@ex.com".to_string(),
            subject: "subject".to_string(),
            body: "body".to_string(),
            attachment: None,
        };

        let err = dispatcher.dispatch_one(&outbound).await.unwrap_err();
        assert!(matches!(err, Error::DeliverNotice { .. }));
    }
}
