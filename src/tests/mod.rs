// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod missing_tags;
