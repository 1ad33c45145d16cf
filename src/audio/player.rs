//! Tone playback service backed by rodio
//!
//! Runs as a background task, receiving tone cues via channel. A missing or
//! broken audio device degrades to silence: the timers keep running, no
//! error is reported.

use tokio::sync::mpsc;
use tracing::debug;

use super::tone::ToneCue;

/// Sender handle for queueing tone cues
pub type ToneSender = mpsc::Sender<ToneCue>;

/// Create a new tone cue channel
pub fn create_tone_channel() -> (ToneSender, mpsc::Receiver<ToneCue>) {
    // Buffer size of 64 should be plenty for tone cues
    mpsc::channel(64)
}

/// Background task that plays queued tone cues
pub async fn tone_player_task(mut cue_rx: mpsc::Receiver<ToneCue>, muted: bool) {
    debug!("Tone player task started (muted={})", muted);

    while let Some(cue) = cue_rx.recv().await {
        // Master audio toggle
        if muted {
            continue;
        }

        debug!(
            "Playing tone: {:.0} Hz for {:?}",
            cue.frequency_hz, cue.duration
        );

        // Each cue gets its own thread; sleep_until_end blocks.
        std::thread::spawn(move || play_blocking(cue));
    }

    debug!("Tone player task stopped");
}

fn play_blocking(cue: ToneCue) {
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, Sink};

    let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
        return;
    };
    let Ok(sink) = Sink::try_new(&stream_handle) else {
        return;
    };

    let mut tone = SineWave::new(cue.frequency_hz).take_duration(cue.duration);
    tone.set_filter_fadeout();

    sink.append(tone.amplify(0.5));
    sink.sleep_until_end();
}
