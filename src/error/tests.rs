// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{
    ConfigError, ForgeError, FsError, HoardError, HoardResult, MirrorError, RetryableError,
    UploadError,
};

#[test]
fn test_config_error_display() {
    let err = ConfigError::MissingKey {
        section: "github".to_string(),
        key: "user".to_string(),
        hint: " (use --github-user)".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"missing required config key 'user' in section '[github]' (use --github-user)"
    );
}

#[test]
fn test_hoard_error_size() {
    let size = std::mem::size_of::<HoardError>();
    assert!(size <= 24, "HoardError is {size} bytes, expected <= 24");
}

#[test]
fn test_hoard_result_size() {
    let size = std::mem::size_of::<HoardResult<()>>();
    assert!(size <= 24, "HoardResult<()> is {size} bytes, expected <= 24");
}

#[test]
fn test_sub_errors_box_into_hoard_error() {
    let err: HoardError = MirrorError::NotAMirror {
        path: "/tmp/a.git".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"mirror error: '/tmp/a.git' exists but is not a bare git mirror"
    );
}

#[test]
fn test_forge_error_retryable() {
    let cases = [
        (
            ForgeError::Transient {
                url: "u".to_string(),
                message: "rate limited".to_string(),
            },
            true,
        ),
        (
            ForgeError::Authentication {
                account: "acme".to_string(),
            },
            false,
        ),
        (
            ForgeError::NotFound {
                account: "acme".to_string(),
            },
            false,
        ),
        (
            ForgeError::HttpError {
                status: 422,
                url: "u".to_string(),
            },
            false,
        ),
    ];
    for (err, expected) in cases {
        assert_eq!(err.is_retryable(), expected, "{err}");
    }
}

#[test]
fn test_upload_error_retryable() {
    assert!(
        UploadError::Transient {
            identifier: "c__a".to_string(),
            message: "503".to_string(),
        }
        .is_retryable()
    );
    assert!(
        !UploadError::Authentication {
            identifier: "c__a".to_string(),
            status: 403,
        }
        .is_retryable()
    );
    assert!(!UploadError::MissingCredentials.is_retryable());
}

#[test]
fn test_fs_error_from_io_classifies_kind() {
    let path = std::path::Path::new("/nope");
    let not_found = FsError::from_io(path, std::io::Error::from(std::io::ErrorKind::NotFound));
    assert!(matches!(not_found, FsError::NotFound(_)));

    let denied = FsError::from_io(
        path,
        std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    );
    assert!(matches!(denied, FsError::PermissionDenied(_)));

    let other = FsError::from_io(path, std::io::Error::other("disk full"));
    assert!(matches!(other, FsError::IoError { .. }));
}
