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

//! lilith-transcript: transcript parsing for a security-operations agent console.
//!
//! This library splits the streamed text of an MCP tool-calling agent into
//! plain narrative, an aggregated reasoning trace and tagged tool invocations,
//! and resolves each invocation's (possibly JSON-RPC wrapped) result envelope
//! into a success/error verdict with display text. Every entry point is pure
//! and tolerates truncated, mid-stream input.

pub mod config;
pub mod engine;
pub mod engine_core;
pub mod protocol;
pub mod stream;
pub mod view;

mod verification;
