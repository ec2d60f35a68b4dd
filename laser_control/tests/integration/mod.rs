mod concurrency;
mod job_runner;
mod scenarios;
