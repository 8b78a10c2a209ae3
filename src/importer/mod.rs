/*!
 * Bulk import of verbs from JSON payloads.
 *
 * - `payload`: document format and per-item validation
 * - `service`: fill-if-absent / force application with per-item transactions
 */

pub mod payload;
pub mod service;

pub use payload::{ImportPayload, ParsedVerb, Patch, PerfektEntry, VerbEntry};
pub use service::{EntityCounts, ImportOptions, ImportPolicy, ImportReport, VerbImporter};
