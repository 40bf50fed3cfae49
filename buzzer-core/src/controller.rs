//! GameController: waits for latched buttons and runs the rounds.

use embedded_hal_async::delay::DelayNs;

use buzzer_proto::{ReactionReport, RoundStart, Serialize, BANNER, MAX_REPORT_SIZE};

use crate::config::{ConfigError, GameConfig};
use crate::input::{EventSource, InputError};
use crate::output::{OutputError, OutputSink};
use crate::rng::{AnsiLcg, RoundRng};
use crate::types::{ButtonEvent, ButtonId};

/// Board-side actions the game loop triggers between rounds.
pub trait RoundControl {
    /// Turn every indicator lamp off.
    fn clear_indicators(&mut self);

    /// Zero the stopwatch and open the reaction window.
    fn restart_stopwatch(&mut self);
}

/// What one pass through the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RoundOutcome {
    /// Start was pressed; the reaction window opened after `delay_ms`.
    Started { delay_ms: u16 },
    /// A colour won and its reaction time was sent.
    Reported(ReactionReport),
}

/// Error type for controller operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerError {
    /// Error from the event source.
    Input(InputError),
    /// Error from the output sink.
    Output(OutputError),
}

impl From<InputError> for ControllerError {
    fn from(err: InputError) -> Self {
        ControllerError::Input(err)
    }
}

impl From<OutputError> for ControllerError {
    fn from(err: OutputError) -> Self {
        ControllerError::Output(err)
    }
}

/// The foreground game loop.
///
/// Owns the event source, the serial sink, a delay provider, the board
/// controls and the delay generator. Nothing here runs in interrupt
/// context.
///
/// # Error Handling
///
/// Every handled event is acknowledged, even when sending its message
/// failed, so a broken link cannot wedge the latch. Only a disconnected
/// source leaves the event unacknowledged.
pub struct GameController<I, O, D, C, R = AnsiLcg> {
    input: I,
    output: O,
    delay: D,
    control: C,
    rng: R,
    config: GameConfig,
}

impl<I, O, D, C> GameController<I, O, D, C, AnsiLcg>
where
    I: EventSource,
    O: OutputSink,
    D: DelayNs,
    C: RoundControl,
{
    /// Create a controller with the default delay generator.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if `config` does not validate.
    pub fn new(
        input: I,
        output: O,
        delay: D,
        control: C,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(input, output, delay, control, AnsiLcg::default(), config)
    }
}

impl<I, O, D, C, R> GameController<I, O, D, C, R>
where
    I: EventSource,
    O: OutputSink,
    D: DelayNs,
    C: RoundControl,
    R: RoundRng,
{
    /// Create a controller with a custom delay generator.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if `config` does not validate.
    pub fn with_rng(
        input: I,
        output: O,
        delay: D,
        control: C,
        rng: R,
        config: GameConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            input,
            output,
            delay,
            control,
            rng,
            config,
        })
    }

    /// Send the boot banner.
    pub async fn greet(&mut self) -> Result<(), OutputError> {
        if !self.output.is_ready() {
            return Err(OutputError::NotReady);
        }
        for line in BANNER {
            self.output.send(line).await?;
        }
        Ok(())
    }

    /// Run rounds forever.
    pub async fn run(&mut self) -> ! {
        loop {
            match self.process_one().await {
                Ok(outcome) => debug!("round: {}", outcome),
                Err(e) => warn!("round failed: {}", e),
            }
        }
    }

    /// Wait for one latched event, handle it and release the latch.
    ///
    /// Returns the outcome for testing purposes.
    pub async fn process_one(&mut self) -> Result<RoundOutcome, ControllerError> {
        let handled = match self.input.receive().await {
            Ok(event) => self.dispatch(event).await,
            Err(InputError::Disconnected) => return Err(InputError::Disconnected.into()),
            Err(e) => Err(e.into()),
        };

        self.delay.delay_ms(self.config.settle_ms).await;
        self.input.acknowledge();
        handled
    }

    async fn dispatch(&mut self, event: ButtonEvent) -> Result<RoundOutcome, ControllerError> {
        match event.button {
            ButtonId::Start => {
                let sent = self.send(&RoundStart).await;

                let seed = self.config.seed_from(event.elapsed);
                let delay_ms = self.rng.draw(seed, &self.config.delay_window);
                trace!("hold-off {} ms (seed {})", delay_ms, seed);
                self.delay.delay_ms(u32::from(delay_ms)).await;

                self.control.clear_indicators();
                self.control.restart_stopwatch();

                sent.map(|()| RoundOutcome::Started { delay_ms })
            }
            button => {
                let millis = self.config.tick_scale.to_millis(event.elapsed);
                let report =
                    ReactionReport::new(button, millis).ok_or(InputError::UnknownButton)?;
                self.send(&report).await?;
                Ok(RoundOutcome::Reported(report))
            }
        }
    }

    async fn send<M: Serialize>(&mut self, message: &M) -> Result<(), ControllerError> {
        if !self.output.is_ready() {
            return Err(OutputError::NotReady.into());
        }
        let mut buf = [0u8; MAX_REPORT_SIZE];
        let len = message.serialize(&mut buf).map_err(OutputError::from)?;
        self.output.send(&buf[..len]).await?;
        Ok(())
    }

    /// Active configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Get a reference to the event source.
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Get a reference to the output sink.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Get a mutable reference to the output sink.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Decompose the controller into its event source and output sink.
    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }
}
