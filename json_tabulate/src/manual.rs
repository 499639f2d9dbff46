//! This is the long-form manual for `json_tabulate` and `interviewtab`.
//!
//! ## Input documents
//!
//! Each input file holds the answers of one respondent, as one JSON object.
//! The top-level keys are the sections of the taxonomy. Below a section, the
//! answers may be nested to any depth:
//!
//! ```json
//! {
//!   "A、基本信息": {
//!     "1、受访者": { "姓名": "张三", "职位": "经理" },
//!     "2、公司": { "规模": "" }
//!   },
//!   "B、需求": { "1、痛点": { "描述": "..." } }
//! }
//! ```
//!
//! Key order matters: it is kept as written in the file. Lists are not
//! traversed and end up as one cell.
//!
//! ## Canonical output
//!
//! ```json
//! {
//!   "baseinfo": { "str1Num": 2 },
//!   "str0": { "L1": "A、基本信息", "L2": "B、需求" },
//!   "str1": { "H1": ["1、受访者", "姓名"], "H2": ["1、受访者", "职位"], "...": [] },
//!   "str2": { "L1": { "H1": "张三", "H2": "经理" }, "L2": { "...": "..." } }
//! }
//! ```
//!
//! * `str0`: one entry per section (`L<n>`), numbered in the order the sections
//!   are first met, file after file.
//! * `str1`: one entry per distinct path below a section (`H<n>`). The paths are
//!   sorted by their first segment, then by the first number found in their
//!   second segment (`2、…` before `10、…`), then by their third segment.
//!   Adding documents that bring no new path does not renumber the columns.
//! * `str2`: the values, by section and by column. Only the leaves that exist
//!   are listed. Empty strings are kept.
//! * `baseinfo.str1Num`: number of segments in the path of `H1`. Spreadsheet
//!   renderers use it to size the header area.
//!
//! A section that directly holds a value (`"姓名": "张三"` at the top level) is
//! stored under the column with the single empty segment `[""]`.
//!
//! ## Command line
//!
//! ```bash
//! interviewtab tabulate --input 'data/json/*.json' --out flattened_output.json
//! ```
//!
//! Documents that cannot be read are reported and skipped. The command fails
//! when no document can be read at all. Passing `--reference expected.json`
//! compares the output with a known result and prints the differences.
//!
//! ```bash
//! interviewtab chunk --input transcript.docx --chunk-size 10000
//! ```
//!
//! Renders the tables of a transcript (Word document or Excel workbook) into
//! text chunks, to be sent to the extraction model.
//!
//! ```bash
//! interviewtab merge --template taxonomy.json --out respondent.json reply1.txt reply2.txt
//! ```
//!
//! Merges the model replies into the taxonomy template and writes one input
//! document.
//!
//! ## Configuration file
//!
//! All the options can also be provided in a JSON file passed with `--config`.
//! Relative paths are resolved against the directory of that file.
//!
//! ```json
//! {
//!   "outputSettings": { "outputPath": "temp/flattened_output.json" },
//!   "inputSettings": { "inputPattern": "json/*.json" },
//!   "extractionSettings": {
//!     "chunkSize": 10000,
//!     "denyWords": ["无", "N/A"],
//!     "accumulateSections": ["总结标签"]
//!   }
//! }
//! ```
//!
