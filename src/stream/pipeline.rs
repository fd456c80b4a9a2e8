// Copyright 2026 BadCompany
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::FramedRead;
use tracing::{debug, error};

use crate::stream::codec::{TranscriptCodec, TranscriptSnapshot};

/// Progress of one streamed agent turn
#[derive(Debug)]
pub enum TranscriptEvent {
    /// New text arrived; segmentation of everything so far
    Snapshot(TranscriptSnapshot),
    /// Stream reached EOF; the last snapshot, i.e. segmentation of the complete text
    Finished(TranscriptSnapshot),
    /// Decoding failed (e.g. size limit); no further events follow
    Error(String),
}

/// Spawns a background task that reads a transcript stream and reports a
/// snapshot per received chunk.
pub fn spawn_transcript_reader<R>(
    stream: R,
    codec: TranscriptCodec,
    tx: mpsc::Sender<TranscriptEvent>,
) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut framed = FramedRead::new(stream, codec);
        let mut last = TranscriptSnapshot::default();

        while let Some(result) = framed.next().await {
            match result {
                Ok(snapshot) => {
                    last = snapshot.clone();
                    if tx.send(TranscriptEvent::Snapshot(snapshot)).await.is_err() {
                        debug!("Transcript receiver dropped, stopping reader");
                        return;
                    }
                }
                Err(e) => {
                    error!("Transcript stream error: {}", e);
                    let _ = tx.send(TranscriptEvent::Error(e.to_string())).await;
                    return;
                }
            }
        }
        let _ = tx.send(TranscriptEvent::Finished(last)).await;
    })
}
