use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf, absolute};

use cargo::{core::Workspace, ops, util::context::GlobalContext};
use semver::Version;
use tempfile::TempDir;
use tracing::debug;

use crate::{
    error::{DocketError, Result},
    target::{Entrypoint, Target},
};

/// A directory holding a Cargo manifest, either on disk or synthesized into a
/// temporary location for registry lookups.
#[derive(Debug)]
pub enum CargoPath {
    /// An existing package or workspace directory.
    Path(PathBuf),
    /// A temporary directory owning a stub crate.
    TempDir(TempDir),
}

impl CargoPath {
    /// Directory this manifest lives in.
    pub fn as_path(&self) -> &Path {
        match self {
            Self::Path(path) => path.as_path(),
            Self::TempDir(temp_dir) => temp_dir.path(),
        }
    }

    /// Absolute path of the Cargo.toml inside this directory.
    pub fn manifest_path(&self) -> PathBuf {
        absolute(self.as_path().join("Cargo.toml")).unwrap_or_else(|_| {
            self.as_path().join("Cargo.toml")
        })
    }

    /// Whether a Cargo.toml exists here.
    pub fn has_manifest(&self) -> bool {
        self.manifest_path().exists()
    }

    /// Whether this directory holds a buildable package.
    pub fn is_package(&self) -> bool {
        self.has_manifest() && !self.is_workspace()
    }

    /// Whether this directory holds a virtual workspace manifest.
    pub fn is_workspace(&self) -> bool {
        if !self.has_manifest() {
            return false;
        }
        cargo_toml::Manifest::from_path(self.manifest_path())
            .map(|m| m.workspace.is_some() && m.package.is_none())
            .unwrap_or(false)
    }

    /// Name of the package declared in this manifest, if it declares one.
    pub fn package_name(&self) -> Result<Option<String>> {
        let manifest = cargo_toml::Manifest::from_path(self.manifest_path())
            .map_err(|e| DocketError::ManifestParse(e.to_string()))?;
        Ok(manifest.package.map(|p| p.name))
    }

    /// Walk upward from `start_dir` until a Cargo.toml is found.
    pub fn nearest_manifest(start_dir: &Path) -> Option<Self> {
        let mut current = start_dir.to_path_buf();
        loop {
            if current.join("Cargo.toml").exists() {
                return Some(Self::Path(current));
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Write a stub crate into this directory that depends on `dependency`,
    /// so a later fetch can locate the package in the registry.
    pub fn create_registry_stub(
        &self,
        dependency: &str,
        version: Option<&Version>,
    ) -> Result<()> {
        if self.has_manifest() {
            return Err(DocketError::Cargo(anyhow::anyhow!(
                "manifest already exists"
            )));
        }
        let src_dir = self.as_path().join("src");
        fs::create_dir_all(&src_dir)?;

        let mut lib_rs = fs::File::create(src_dir.join("lib.rs"))?;
        writeln!(lib_rs, "// registry lookup stub")?;

        let version_str = version.map_or_else(|| "*".to_string(), Version::to_string);
        let manifest = format!(
            r#"[package]
            name = "docket-registry-stub"
            version = "0.0.0"

            [dependencies]
            {dependency} = "{version_str}"
            "#,
        );
        fs::write(self.manifest_path(), manifest)?;
        Ok(())
    }

    /// Fetch this manifest's dependencies and return the package directory of
    /// `dependency` if it appears in the resolved graph.
    pub fn find_dependency(&self, dependency: &str, offline: bool) -> Result<Option<Self>> {
        let mut gctx = GlobalContext::default()?;
        gctx.configure(
            0,     // verbose
            true,  // quiet
            None,  // color
            false, // frozen
            false, // locked
            offline,
            &None, // target_dir
            &[],   // unstable_flags
            &[],   // cli_config
        )?;
        let workspace = Workspace::new(&self.manifest_path(), &gctx)?;

        let (_, package_set) = ops::fetch(
            &workspace,
            &ops::FetchOptions {
                gctx: &gctx,
                targets: vec![],
            },
        )?;

        for package in package_set.packages() {
            if package.name().as_str() == dependency {
                let package_dir = package
                    .manifest_path()
                    .parent()
                    .ok_or_else(|| DocketError::Cargo(anyhow::anyhow!("manifest has no parent")))?
                    .to_path_buf();
                return Ok(Some(Self::Path(package_dir)));
            }
        }

        Ok(None)
    }

    /// Look up a workspace member by name, accepting both `-` and `_` forms.
    pub fn find_workspace_package(&self, member_name: &str) -> Result<Option<Self>> {
        let underscored = member_name.replace('-', "_");

        let gctx = GlobalContext::default()?;
        let workspace = Workspace::new(&self.manifest_path(), &gctx)?;

        for package in workspace.members() {
            let name = package.name();
            if name.as_str() == member_name || name.as_str() == underscored {
                let package_dir = package
                    .manifest_path()
                    .parent()
                    .ok_or_else(|| DocketError::Cargo(anyhow::anyhow!("manifest has no parent")))?
                    .to_path_buf();
                return Ok(Some(Self::Path(package_dir)));
            }
        }

        Ok(None)
    }
}

/// A module reference resolved to a buildable package.
///
/// The filter holds any module path components left over after resolution;
/// rendering is scoped to that subtree.
#[derive(Debug)]
pub struct ResolvedTarget {
    /// Directory of the package to document.
    pub package_path: CargoPath,
    /// Module path within the package, possibly empty.
    pub filter: Vec<String>,
}

/// Resolve a parsed module reference to a package directory.
///
/// Resolution order for named entrypoints: the enclosing package itself, a
/// dependency of the enclosing package, a workspace member, a module of the
/// enclosing package, and finally a registry package fetched through a stub
/// crate.
pub fn resolve(target: &Target, offline: bool) -> Result<ResolvedTarget> {
    match &target.entrypoint {
        Entrypoint::Path(path) => resolve_path(path, &target.path),
        Entrypoint::Name { name, version } => {
            resolve_name(name, version.as_ref(), &target.path, offline)
        }
    }
}

fn resolve_path(path: &Path, module_path: &[String]) -> Result<ResolvedTarget> {
    if !path.exists() {
        return Err(DocketError::ModuleNotFound(format!(
            "path {} does not exist",
            path.display()
        )));
    }
    let root = CargoPath::nearest_manifest(path).ok_or(DocketError::ManifestNotFound)?;

    if root.is_package() {
        return Ok(ResolvedTarget {
            package_path: root,
            filter: module_path.to_vec(),
        });
    }

    // A workspace path needs a member as the first module path component.
    let Some((member, rest)) = module_path.split_first() else {
        return Err(DocketError::ModuleNotFound(format!(
            "{} is a workspace; name one of its members",
            root.as_path().display()
        )));
    };
    match root.find_workspace_package(member)? {
        Some(package) => Ok(ResolvedTarget {
            package_path: package,
            filter: rest.to_vec(),
        }),
        None => Err(DocketError::ModuleNotFound(format!(
            "no workspace member named {member}"
        ))),
    }
}

fn resolve_name(
    name: &str,
    version: Option<&Version>,
    module_path: &[String],
    offline: bool,
) -> Result<ResolvedTarget> {
    if let Some(root) = CargoPath::nearest_manifest(Path::new(".")) {
        if root.is_package() {
            if root.package_name()?.as_deref() == Some(name) {
                return Ok(ResolvedTarget {
                    package_path: root,
                    filter: module_path.to_vec(),
                });
            }
            if let Some(dep) = root.find_dependency(name, offline)? {
                debug!(package = name, "resolved module reference to a dependency");
                return Ok(ResolvedTarget {
                    package_path: dep,
                    filter: module_path.to_vec(),
                });
            }
            // Not a dependency, so the name addresses a module of the
            // enclosing package.
            let mut filter = vec![name.to_string()];
            filter.extend(module_path.iter().cloned());
            return Ok(ResolvedTarget {
                package_path: root,
                filter,
            });
        }
        if root.is_workspace() {
            if let Some(package) = root.find_workspace_package(name)? {
                return Ok(ResolvedTarget {
                    package_path: package,
                    filter: module_path.to_vec(),
                });
            }
        }
    }

    debug!(package = name, "looking up module reference in the registry");
    let stub = CargoPath::TempDir(TempDir::new()?);
    stub.create_registry_stub(name, version)?;
    match stub.find_dependency(name, offline)? {
        Some(package) => Ok(ResolvedTarget {
            package_path: package,
            filter: module_path.to_vec(),
        }),
        None => Err(DocketError::ModuleNotFound(format!(
            "package {name} not found in the registry"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_create_registry_stub() -> Result<()> {
        let temp_dir = tempdir()?;
        let cargo_path = CargoPath::Path(temp_dir.path().to_path_buf());

        cargo_path.create_registry_stub("serde", None)?;
        assert!(cargo_path.has_manifest());

        let manifest = fs::read_to_string(cargo_path.manifest_path())?;
        assert!(manifest.contains("[dependencies]"));
        assert!(manifest.contains("serde = \"*\""));

        // A second stub in the same place must fail.
        assert!(cargo_path.create_registry_stub("rand", None).is_err());

        Ok(())
    }

    #[test]
    fn test_create_registry_stub_with_version() -> Result<()> {
        let temp_dir = tempdir()?;
        let cargo_path = CargoPath::Path(temp_dir.path().to_path_buf());

        let version = Version::parse("1.0.104").unwrap();
        cargo_path.create_registry_stub("serde", Some(&version))?;

        let manifest = fs::read_to_string(cargo_path.manifest_path())?;
        assert!(manifest.contains("serde = \"1.0.104\""));

        Ok(())
    }

    #[test]
    fn test_is_workspace() -> Result<()> {
        let temp_dir = tempdir()?;
        let cargo_path = CargoPath::Path(temp_dir.path().to_path_buf());

        fs::write(
            cargo_path.manifest_path(),
            r#"
            [workspace]
            members = ["member1"]
            "#,
        )?;
        assert!(cargo_path.is_workspace());
        assert!(!cargo_path.is_package());

        fs::write(
            cargo_path.manifest_path(),
            r#"
            [package]
            name = "single"
            version = "0.1.0"
            "#,
        )?;
        assert!(!cargo_path.is_workspace());
        assert!(cargo_path.is_package());

        Ok(())
    }

    #[test]
    fn test_package_name() -> Result<()> {
        let temp_dir = tempdir()?;
        let cargo_path = CargoPath::Path(temp_dir.path().to_path_buf());

        fs::write(
            cargo_path.manifest_path(),
            r#"
            [package]
            name = "mylib"
            version = "0.1.0"
            "#,
        )?;
        assert_eq!(cargo_path.package_name()?.as_deref(), Some("mylib"));

        Ok(())
    }

    #[test]
    fn test_nearest_manifest() {
        let temp_dir = tempdir().unwrap();
        fs::write(temp_dir.path().join("Cargo.toml"), "[package]").unwrap();

        let sub_dir = temp_dir.path().join("src").join("services");
        fs::create_dir_all(&sub_dir).unwrap();

        let found = CargoPath::nearest_manifest(&sub_dir).unwrap();
        assert_eq!(found.as_path(), temp_dir.path());
    }

    #[test]
    fn test_find_workspace_package() {
        let temp_dir = tempdir().unwrap();

        fs::write(
            temp_dir.path().join("Cargo.toml"),
            r#"
            [workspace]
            members = ["member1"]
            "#,
        )
        .unwrap();

        let member_dir = temp_dir.path().join("member1");
        fs::create_dir_all(member_dir.join("src")).unwrap();
        fs::write(
            member_dir.join("Cargo.toml"),
            r#"
            [package]
            name = "member1"
            version = "0.1.0"
            "#,
        )
        .unwrap();
        fs::write(member_dir.join("src").join("lib.rs"), "").unwrap();

        let root = CargoPath::Path(temp_dir.path().to_path_buf());
        let found = root.find_workspace_package("member1").unwrap().unwrap();
        assert_eq!(found.as_path(), member_dir);

        assert!(root.find_workspace_package("absent").unwrap().is_none());
    }

    #[test]
    fn test_resolve_path_targets() {
        let temp_dir = tempdir().unwrap();
        fs::write(
            temp_dir.path().join("Cargo.toml"),
            r#"
            [package]
            name = "mylib"
            version = "0.1.0"
            "#,
        )
        .unwrap();

        let target = Target {
            entrypoint: Entrypoint::Path(temp_dir.path().to_path_buf()),
            path: vec!["services".to_string()],
        };
        let resolved = resolve(&target, true).unwrap();
        assert_eq!(resolved.package_path.as_path(), temp_dir.path());
        assert_eq!(resolved.filter, vec!["services".to_string()]);

        let missing = Target {
            entrypoint: Entrypoint::Path(PathBuf::from("/non/existent/path")),
            path: vec![],
        };
        assert!(matches!(
            resolve(&missing, true),
            Err(DocketError::ModuleNotFound(_))
        ));
    }
}
