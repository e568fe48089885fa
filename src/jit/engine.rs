use std::collections::HashMap;

use inkwell::{
    context::Context, execution_engine::ExecutionEngine, module::Module as LlvmModule,
    targets::{InitializationConfig, Target},
    OptimizationLevel,
};
use lazy_static::lazy_static;
use log::{debug, info, log_enabled, trace, Level};

use crate::{
    ast::{
        declarations::Module,
        types::{DataType, Value},
    },
    compiler::compiler::compile_module,
    errors::errors::{Error, ErrorImpl},
    printer::printer::pretty_print,
};

lazy_static! {
    static ref NATIVE_TARGET: Result<(), String> =
        Target::initialize_native(&InitializationConfig::default());
}

/// Prepares LLVM to generate code for the host. Runs once per process; later
/// calls return the first outcome.
pub fn initialize_native_target() -> Result<(), Error> {
    NATIVE_TARGET
        .clone()
        .map_err(|message| Error::new(ErrorImpl::NativeTarget { message }, None))
}

/// How modules are compiled and run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    pub optimization_level: OptimizationLevel,
    /// Run the LLVM verifier on every generated module.
    pub verify_module: bool,
    /// Log the generated IR at info level instead of trace.
    pub dump_ir: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        ExecutionOptions {
            optimization_level: OptimizationLevel::None,
            verify_module: true,
            dump_ir: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct EntryPoint {
    return_type: DataType,
    parameter_count: usize,
}

/// A JIT engine plus the signatures of every function added to it.
pub struct ExecutionContext<'ctx> {
    context: &'ctx Context,
    options: ExecutionOptions,
    engine: ExecutionEngine<'ctx>,
    modules: Vec<LlvmModule<'ctx>>,
    entry_points: HashMap<String, EntryPoint>,
}

impl<'ctx> ExecutionContext<'ctx> {
    pub fn new(context: &'ctx Context, options: ExecutionOptions) -> Result<Self, Error> {
        initialize_native_target()?;

        let module = context.create_module("ExecutionContext");
        let engine = module
            .create_jit_execution_engine(options.optimization_level)
            .map_err(|message| {
                Error::new(
                    ErrorImpl::Backend {
                        message: message.to_string(),
                    },
                    None,
                )
            })?;
        debug!(
            "created JIT execution engine ({:?})",
            options.optimization_level
        );

        Ok(ExecutionContext {
            context,
            options,
            engine,
            modules: vec![module],
            entry_points: HashMap::new(),
        })
    }

    pub fn options(&self) -> ExecutionOptions {
        self.options
    }

    /// Compiles `module` and makes its functions callable.
    pub fn add_module(&mut self, module: &Module) -> Result<(), Error> {
        for function in module.functions() {
            if self.entry_points.contains_key(function.name()) {
                return Err(Error::at(
                    ErrorImpl::FunctionAlreadyDeclared {
                        function: function.name().to_string(),
                    },
                    function.id(),
                ));
            }
        }

        if log_enabled!(Level::Debug) {
            debug!("adding module:\n{}", pretty_print(module)?);
        }

        let compiled = compile_module(self.context, module, self.options.verify_module)?;
        let ir = compiled.print_to_string().to_string();
        if self.options.dump_ir {
            info!("generated IR for {}:\n{}", module.name(), ir);
        } else {
            trace!("generated IR for {}:\n{}", module.name(), ir);
        }

        self.engine.add_module(&compiled).map_err(|()| {
            Error::new(
                ErrorImpl::Backend {
                    message: format!("module {} is already owned by an engine", module.name()),
                },
                Some(module.id()),
            )
        })?;

        for function in module.functions() {
            self.entry_points.insert(
                function.name().to_string(),
                EntryPoint {
                    return_type: function.return_type(),
                    parameter_count: function.parameters().len(),
                },
            );
        }
        self.modules.push(compiled);
        Ok(())
    }

    /// Native address of the compiled function `name`.
    pub fn resolve_entry_point(&self, name: &str) -> Option<usize> {
        let address = self.engine.get_function_address(name).ok();
        trace!("resolved {} to {:?}", name, address);
        address
    }

    /// Calls the zero-parameter function `name` and returns its result.
    pub fn invoke(&self, name: &str) -> Result<Value, Error> {
        let entry_point = self.entry_points.get(name).copied().ok_or_else(|| {
            Error::new(
                ErrorImpl::EntryPointNotFound {
                    name: name.to_string(),
                },
                None,
            )
        })?;

        if entry_point.parameter_count > 0 {
            return Err(Error::invalid_argument(
                "name",
                format!(
                    "{} takes {} parameter(s) and cannot be invoked directly",
                    name, entry_point.parameter_count
                ),
            ));
        }

        debug!("invoking {} -> {}", name, entry_point.return_type);
        let value = match entry_point.return_type {
            DataType::Void => {
                self.call::<()>(name)?;
                Value::Void
            }
            DataType::Bool => Value::Bool(self.call::<i8>(name)? != 0),
            DataType::Int32 => Value::Int32(self.call::<i32>(name)?),
            DataType::Float => Value::Float(self.call::<f32>(name)?),
            DataType::Double => Value::Double(self.call::<f64>(name)?),
            DataType::Pointer => return Err(Error::unhandled(DataType::Pointer, None)),
        };

        Ok(value)
    }

    fn call<T>(&self, name: &str) -> Result<T, Error> {
        // SAFETY: `T` is the native type of the return type recorded for
        // `name` when its module was added, and the function takes no
        // parameters.
        unsafe {
            let function = self
                .engine
                .get_function::<unsafe extern "C" fn() -> T>(name)
                .map_err(|error| {
                    Error::new(
                        ErrorImpl::EntryPointNotFound {
                            name: format!("{} ({})", name, error),
                        },
                        None,
                    )
                })?;
            Ok(function.call())
        }
    }
}
