/* bus-timelapse: Frame-by-frame renderings of infections spreading on a bus

    Copyright 2020 Fabio A. Correa Duran facorread@gmail.com

   Licensed under the Apache License, Version 2.0 (the "License");
   you may not use this file except in compliance with the License.
   You may obtain a copy of the License at

       http://www.apache.org/licenses/LICENSE-2.0

   Unless required by applicable law or agreed to in writing, software
   distributed under the License is distributed on an "AS IS" BASIS,
   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
   See the License for the specific language governing permissions and
   limitations under the License.
*/

//! Error types for rendering frames and timelapses.

use thiserror::Error;

/// Errors that abort a render call. Nothing is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The plotting backend failed. Backend error types are generic over the backend, so only the message is kept.
    #[error("drawing error: {0}")]
    Drawing(String),

    #[error("model step failed: {0}")]
    Step(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Alias for `Result<T, RenderError>`.
pub type RenderResult<T> = Result<T, RenderError>;

pub(crate) fn drawing_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Drawing(err.to_string())
}
