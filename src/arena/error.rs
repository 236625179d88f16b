/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::collections::TryReserveError;
use std::error::Error;
use std::fmt::Display;

/// Error type for arena capacity exhaustion.
///
/// Arena methods return this error when an allocation would not
/// fit into the remaining capacity of the fixed size buffer, or
/// when the buffer itself could not be reserved. The arena never
/// grows, so the only remedy is starting over with a larger
/// capacity.
///
/// Details about the failed allocation are not included to keep
/// this error as lightweight as possible. The requested size is
/// logged at the debug level instead.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NoMemory;

impl Display for NoMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "not enough memory")
    }
}

impl Error for NoMemory {}

impl From<TryReserveError> for NoMemory {
    fn from(_: TryReserveError) -> Self {
        NoMemory
    }
}
