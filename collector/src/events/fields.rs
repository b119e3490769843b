//! Allow-listed attributes per event kind, named as the Spark REST API names them.

/// Entries of `/api/v1/applications/{id}/jobs`.
pub const JOB_FIELDS: [&str; 16] = [
    "jobId",
    "name",
    "submissionTime",
    "jobGroup",
    "status",
    "numTasks",
    "numActiveTasks",
    "numCompletedTasks",
    "numSkippedTasks",
    "numFailedTasks",
    "numKilledTasks",
    "numCompletedIndices",
    "numActiveStages",
    "numCompletedStages",
    "numSkippedStages",
    "numFailedStages",
];

/// Entries of `/api/v1/applications/{id}/stages`.
pub const STAGE_FIELDS: [&str; 25] = [
    "stageId",
    "name",
    "status",
    "attemptId",
    "numTasks",
    "schedulingPool",
    "numActiveTasks",
    "numCompleteTasks",
    "numFailedTasks",
    "numKilledTasks",
    "numCompletedIndices",
    "executorRunTime",
    "executorCpuTime",
    "submissionTime",
    "firstTaskLaunchedTime",
    "inputBytes",
    "inputRecords",
    "outputBytes",
    "outputRecords",
    "shuffleReadBytes",
    "shuffleReadRecords",
    "shuffleWriteBytes",
    "shuffleWriteRecords",
    "memoryBytesSpilled",
    "diskBytesSpilled",
];

/// Entries of `/api/v1/applications/{id}/executors`. The nested `memoryMetrics` object is flattened separately.
pub const EXECUTOR_FIELDS: [&str; 20] = [
    "id",
    "hostPort",
    "isActive",
    "rddBlocks",
    "memoryUsed",
    "diskUsed",
    "totalCores",
    "maxTasks",
    "activeTasks",
    "failedTasks",
    "completedTasks",
    "totalTasks",
    "totalDuration",
    "totalGCTime",
    "totalInputBytes",
    "totalShuffleRead",
    "totalShuffleWrite",
    "isBlacklisted",
    "maxMemory",
    "addTime",
];

/// `/api/v1/applications/{id}/streaming/statistics`.
pub const STREAMING_STATISTICS_FIELDS: [&str; 13] = [
    "batchDuration",
    "numReceivers",
    "numActiveReceivers",
    "numInactiveReceivers",
    "numTotalCompletedBatches",
    "numRetainedCompletedBatches",
    "numActiveBatches",
    "numProcessedRecords",
    "numReceivedRecords",
    "avgInputRate",
    "avgSchedulingDelay",
    "avgProcessingTime",
    "avgTotalDelay",
];
