// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! MapReduce counters, raw and typed.
//!
//! The server reports counters as named groups of named values. The raw
//! shapes below mirror the wire; the typed structs give well-known groups
//! named fields so callers need not chase string keys. Converting a group
//! into the wrong typed family is a caller error and is reported as such,
//! while the aggregate [`TypedCounters`] view simply skips groups it does
//! not recognize.

use serde::Deserialize;

use crate::Error;
use crate::ErrorKind;
use crate::Result;

/// One named counter.
///
/// Job level counters carry the total/map/reduce triple; task and attempt
/// level counters carry a single `value`. Absent fields default to zero.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Counter {
    /// Counter name, e.g. `FILE_BYTES_READ`.
    pub name: String,
    /// Job level total across all tasks.
    pub total_counter_value: i64,
    /// Job level total across map tasks.
    pub map_counter_value: i64,
    /// Job level total across reduce tasks.
    pub reduce_counter_value: i64,
    /// Task or attempt level value.
    pub value: i64,
}

impl Counter {
    /// The counter's magnitude regardless of which schema the server used:
    /// the job level total when present, the task level value otherwise.
    pub fn amount(&self) -> i64 {
        if self.total_counter_value != 0 {
            self.total_counter_value
        } else {
            self.value
        }
    }
}

/// One named group of counters.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CounterGroup {
    /// Group name, a Java class name for the built-in families.
    pub counter_group_name: String,
    /// Counters in the group.
    pub counter: Vec<Counter>,
}

impl CounterGroup {
    /// Look up one counter by name.
    pub fn get(&self, name: &str) -> Option<&Counter> {
        self.counter.iter().find(|c| c.name == name)
    }
}

/// The `jobCounters` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobCounters {
    /// Job id.
    pub id: String,
    /// Counter groups.
    pub counter_group: Vec<CounterGroup>,
}

/// The `jobTaskCounters` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskCounters {
    /// Task id.
    pub id: String,
    /// Counter groups.
    pub task_counter_group: Vec<CounterGroup>,
}

/// The `jobTaskAttemptCounters` envelope.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskAttemptCounters {
    /// Attempt id.
    pub id: String,
    /// Counter groups.
    pub task_attempt_counter_group: Vec<CounterGroup>,
}

fn ensure_group(group: &CounterGroup, expected: &'static str) -> Result<()> {
    if group.counter_group_name != expected {
        return Err(Error::new(
            ErrorKind::InvalidCounterGroup,
            "counter group does not belong to this family",
        )
        .with_context("expected", expected)
        .with_context("actual", group.counter_group_name.clone()));
    }
    Ok(())
}

/// The `FileSystemCounter` family: bytes and operations per filesystem.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileSystemCounters {
    /// Bytes read from the local filesystem.
    pub file_bytes_read: i64,
    /// Bytes written to the local filesystem.
    pub file_bytes_written: i64,
    /// Read operations on the local filesystem.
    pub file_read_ops: i64,
    /// Large read operations on the local filesystem.
    pub file_large_read_ops: i64,
    /// Write operations on the local filesystem.
    pub file_write_ops: i64,
    /// Bytes read from HDFS.
    pub hdfs_bytes_read: i64,
    /// Bytes written to HDFS.
    pub hdfs_bytes_written: i64,
    /// Read operations on HDFS.
    pub hdfs_read_ops: i64,
    /// Large read operations on HDFS.
    pub hdfs_large_read_ops: i64,
    /// Write operations on HDFS.
    pub hdfs_write_ops: i64,
}

impl FileSystemCounters {
    /// Wire name of this family's group.
    pub const GROUP_NAME: &'static str = "org.apache.hadoop.mapreduce.FileSystemCounter";

    /// Build from a raw group, failing when the group belongs to another
    /// family.
    pub fn from_group(group: &CounterGroup) -> Result<Self> {
        ensure_group(group, Self::GROUP_NAME)?;
        let mut out = Self::default();
        for c in &group.counter {
            let v = c.amount();
            match c.name.as_str() {
                "FILE_BYTES_READ" => out.file_bytes_read = v,
                "FILE_BYTES_WRITTEN" => out.file_bytes_written = v,
                "FILE_READ_OPS" => out.file_read_ops = v,
                "FILE_LARGE_READ_OPS" => out.file_large_read_ops = v,
                "FILE_WRITE_OPS" => out.file_write_ops = v,
                "HDFS_BYTES_READ" => out.hdfs_bytes_read = v,
                "HDFS_BYTES_WRITTEN" => out.hdfs_bytes_written = v,
                "HDFS_READ_OPS" => out.hdfs_read_ops = v,
                "HDFS_LARGE_READ_OPS" => out.hdfs_large_read_ops = v,
                "HDFS_WRITE_OPS" => out.hdfs_write_ops = v,
                _ => {}
            }
        }
        Ok(out)
    }
}

/// The `TaskCounter` family: record flow through the map and reduce
/// phases.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MapReduceTaskCounters {
    /// Records read by maps.
    pub map_input_records: i64,
    /// Records emitted by maps.
    pub map_output_records: i64,
    /// Bytes emitted by maps before compression.
    pub map_output_bytes: i64,
    /// Bytes emitted by maps after compression.
    pub map_output_materialized_bytes: i64,
    /// Bytes of input split metadata.
    pub split_raw_bytes: i64,
    /// Records consumed by combiners.
    pub combine_input_records: i64,
    /// Records emitted by combiners.
    pub combine_output_records: i64,
    /// Distinct keys seen by reduces.
    pub reduce_input_groups: i64,
    /// Bytes shuffled to reduces.
    pub reduce_shuffle_bytes: i64,
    /// Records consumed by reduces.
    pub reduce_input_records: i64,
    /// Records emitted by reduces.
    pub reduce_output_records: i64,
    /// Records spilled to disk.
    pub spilled_records: i64,
    /// Map outputs shuffled.
    pub shuffled_maps: i64,
    /// Shuffle fetches that failed.
    pub failed_shuffle: i64,
    /// Map outputs merged.
    pub merged_map_outputs: i64,
    /// Milliseconds spent in garbage collection.
    pub gc_time_millis: i64,
    /// CPU milliseconds consumed.
    pub cpu_milliseconds: i64,
    /// Physical memory snapshot in bytes.
    pub physical_memory_bytes: i64,
    /// Virtual memory snapshot in bytes.
    pub virtual_memory_bytes: i64,
    /// Committed heap snapshot in bytes.
    pub committed_heap_bytes: i64,
}

impl MapReduceTaskCounters {
    /// Wire name of this family's group.
    pub const GROUP_NAME: &'static str = "org.apache.hadoop.mapreduce.TaskCounter";

    /// Build from a raw group, failing when the group belongs to another
    /// family.
    pub fn from_group(group: &CounterGroup) -> Result<Self> {
        ensure_group(group, Self::GROUP_NAME)?;
        let mut out = Self::default();
        for c in &group.counter {
            let v = c.amount();
            match c.name.as_str() {
                "MAP_INPUT_RECORDS" => out.map_input_records = v,
                "MAP_OUTPUT_RECORDS" => out.map_output_records = v,
                "MAP_OUTPUT_BYTES" => out.map_output_bytes = v,
                "MAP_OUTPUT_MATERIALIZED_BYTES" => out.map_output_materialized_bytes = v,
                "SPLIT_RAW_BYTES" => out.split_raw_bytes = v,
                "COMBINE_INPUT_RECORDS" => out.combine_input_records = v,
                "COMBINE_OUTPUT_RECORDS" => out.combine_output_records = v,
                "REDUCE_INPUT_GROUPS" => out.reduce_input_groups = v,
                "REDUCE_SHUFFLE_BYTES" => out.reduce_shuffle_bytes = v,
                "REDUCE_INPUT_RECORDS" => out.reduce_input_records = v,
                "REDUCE_OUTPUT_RECORDS" => out.reduce_output_records = v,
                "SPILLED_RECORDS" => out.spilled_records = v,
                "SHUFFLED_MAPS" => out.shuffled_maps = v,
                "FAILED_SHUFFLE" => out.failed_shuffle = v,
                "MERGED_MAP_OUTPUTS" => out.merged_map_outputs = v,
                "GC_TIME_MILLIS" => out.gc_time_millis = v,
                "CPU_MILLISECONDS" => out.cpu_milliseconds = v,
                "PHYSICAL_MEMORY_BYTES" => out.physical_memory_bytes = v,
                "VIRTUAL_MEMORY_BYTES" => out.virtual_memory_bytes = v,
                "COMMITTED_HEAP_BYTES" => out.committed_heap_bytes = v,
                _ => {}
            }
        }
        Ok(out)
    }
}

/// The `Shuffle Errors` family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ShuffleErrors {
    /// Fetches rejected for a bad map id.
    pub bad_id: i64,
    /// Fetches that failed to connect.
    pub connection: i64,
    /// Fetches that failed with an IO error.
    pub io_error: i64,
    /// Fetches with a wrong length.
    pub wrong_length: i64,
    /// Fetches of the wrong map output.
    pub wrong_map: i64,
    /// Fetches routed to the wrong reduce.
    pub wrong_reduce: i64,
}

impl ShuffleErrors {
    /// Wire name of this family's group. Unlike the others this one is a
    /// display name, not a class name.
    pub const GROUP_NAME: &'static str = "Shuffle Errors";

    /// Build from a raw group, failing when the group belongs to another
    /// family.
    pub fn from_group(group: &CounterGroup) -> Result<Self> {
        ensure_group(group, Self::GROUP_NAME)?;
        let mut out = Self::default();
        for c in &group.counter {
            let v = c.amount();
            match c.name.as_str() {
                "BAD_ID" => out.bad_id = v,
                "CONNECTION" => out.connection = v,
                "IO_ERROR" => out.io_error = v,
                "WRONG_LENGTH" => out.wrong_length = v,
                "WRONG_MAP" => out.wrong_map = v,
                "WRONG_REDUCE" => out.wrong_reduce = v,
                _ => {}
            }
        }
        Ok(out)
    }
}

/// The `FileInputFormatCounter` family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileInputFormatCounters {
    /// Bytes read by the input format.
    pub bytes_read: i64,
}

impl FileInputFormatCounters {
    /// Wire name of this family's group.
    pub const GROUP_NAME: &'static str =
        "org.apache.hadoop.mapreduce.lib.input.FileInputFormatCounter";

    /// Build from a raw group, failing when the group belongs to another
    /// family.
    pub fn from_group(group: &CounterGroup) -> Result<Self> {
        ensure_group(group, Self::GROUP_NAME)?;
        let mut out = Self::default();
        for c in &group.counter {
            if c.name == "BYTES_READ" {
                out.bytes_read = c.amount();
            }
        }
        Ok(out)
    }
}

/// The `FileOutputFormatCounter` family.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FileOutputFormatCounters {
    /// Bytes written by the output format.
    pub bytes_written: i64,
}

impl FileOutputFormatCounters {
    /// Wire name of this family's group.
    pub const GROUP_NAME: &'static str =
        "org.apache.hadoop.mapreduce.lib.output.FileOutputFormatCounter";

    /// Build from a raw group, failing when the group belongs to another
    /// family.
    pub fn from_group(group: &CounterGroup) -> Result<Self> {
        ensure_group(group, Self::GROUP_NAME)?;
        let mut out = Self::default();
        for c in &group.counter {
            if c.name == "BYTES_WRITTEN" {
                out.bytes_written = c.amount();
            }
        }
        Ok(out)
    }
}

/// All well-known counter families of one job, task or attempt.
///
/// Groups the server sent that match no known family are skipped, as are
/// families the server did not send.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TypedCounters {
    /// Filesystem bytes and operations.
    pub file_system: Option<FileSystemCounters>,
    /// Record flow through the map and reduce phases.
    pub task: Option<MapReduceTaskCounters>,
    /// Shuffle fetch failures.
    pub shuffle_errors: Option<ShuffleErrors>,
    /// Input format reads.
    pub file_input_format: Option<FileInputFormatCounters>,
    /// Output format writes.
    pub file_output_format: Option<FileOutputFormatCounters>,
}

impl TypedCounters {
    /// Sort raw groups into their typed families by group name.
    pub fn from_groups(groups: &[CounterGroup]) -> Self {
        let mut out = Self::default();
        for group in groups {
            match group.counter_group_name.as_str() {
                FileSystemCounters::GROUP_NAME => {
                    out.file_system = FileSystemCounters::from_group(group).ok();
                }
                MapReduceTaskCounters::GROUP_NAME => {
                    out.task = MapReduceTaskCounters::from_group(group).ok();
                }
                ShuffleErrors::GROUP_NAME => {
                    out.shuffle_errors = ShuffleErrors::from_group(group).ok();
                }
                FileInputFormatCounters::GROUP_NAME => {
                    out.file_input_format = FileInputFormatCounters::from_group(group).ok();
                }
                FileOutputFormatCounters::GROUP_NAME => {
                    out.file_output_format = FileOutputFormatCounters::from_group(group).ok();
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::raw::parse_json_object;
    use crate::raw::unwrap_envelope;
    use crate::raw::FromJson;

    fn file_system_group() -> CounterGroup {
        CounterGroup {
            counter_group_name: FileSystemCounters::GROUP_NAME.to_string(),
            counter: vec![
                Counter {
                    name: "FILE_BYTES_READ".to_string(),
                    total_counter_value: 123,
                    ..Default::default()
                },
                Counter {
                    name: "HDFS_BYTES_WRITTEN".to_string(),
                    total_counter_value: 4096,
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn test_typed_counters_from_matching_group() {
        let fs = FileSystemCounters::from_group(&file_system_group()).unwrap();
        assert_eq!(fs.file_bytes_read, 123);
        assert_eq!(fs.hdfs_bytes_written, 4096);
        // Counters the server did not send stay at zero.
        assert_eq!(fs.hdfs_bytes_read, 0);
    }

    #[test]
    fn test_wrong_family_is_an_error() {
        let err = ShuffleErrors::from_group(&file_system_group()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCounterGroup);
        assert_eq!(err.context_value("expected"), Some("Shuffle Errors"));
    }

    #[test]
    fn test_aggregate_skips_unknown_groups() {
        let unknown = CounterGroup {
            counter_group_name: "com.example.CustomCounters".to_string(),
            counter: vec![Counter {
                name: "WIDGETS".to_string(),
                value: 7,
                ..Default::default()
            }],
        };
        let typed = TypedCounters::from_groups(&[file_system_group(), unknown]);
        assert_eq!(typed.file_system.unwrap().file_bytes_read, 123);
        assert!(typed.task.is_none());
        assert!(typed.shuffle_errors.is_none());
    }

    #[test]
    fn test_job_counters_wire_shape() {
        let json = br#"
{
  "jobCounters": {
    "id": "job_1326232085508_4_4",
    "counterGroup": [
      {
        "counterGroupName": "Shuffle Errors",
        "counter": [
          {"name": "BAD_ID", "totalCounterValue": 0,
           "mapCounterValue": 0, "reduceCounterValue": 0},
          {"name": "IO_ERROR", "totalCounterValue": 2,
           "mapCounterValue": 0, "reduceCounterValue": 2}
        ]
      }
    ]
  }
}
"#;
        let map = parse_json_object(json);
        let counters = JobCounters::from_json(unwrap_envelope(&map, "jobCounters").unwrap());
        assert_eq!(counters.id, "job_1326232085508_4_4");
        assert_eq!(counters.counter_group.len(), 1);

        let shuffle = ShuffleErrors::from_group(&counters.counter_group[0]).unwrap();
        assert_eq!(shuffle.io_error, 2);
        assert_eq!(shuffle.bad_id, 0);
    }

    #[test]
    fn test_task_counters_use_value_field() {
        let group = CounterGroup {
            counter_group_name: FileInputFormatCounters::GROUP_NAME.to_string(),
            counter: vec![Counter {
                name: "BYTES_READ".to_string(),
                value: 2048,
                ..Default::default()
            }],
        };
        let input = FileInputFormatCounters::from_group(&group).unwrap();
        assert_eq!(input.bytes_read, 2048);
    }
}
